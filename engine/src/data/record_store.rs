// Holds the session's current record collection
use ndf_shared::models::NdfRecord;
use std::sync::Arc;

/// The collection is only ever replaced as a whole. Readers hold an `Arc`
/// snapshot, so they see either the old or the new collection, never a mix.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<[NdfRecord]>,
    generation: u64,
}

impl RecordStore {
    pub fn new() -> Self {
        RecordStore {
            records: Arc::from(Vec::new()),
            generation: 0,
        }
    }

    pub fn replace(&mut self, records: Vec<NdfRecord>) {
        self.records = Arc::from(records);
        self.generation += 1;
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    pub fn snapshot(&self) -> Arc<[NdfRecord]> {
        Arc::clone(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bumped on every publish, including clears.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
