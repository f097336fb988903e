// Handler for loading a CSV file into the record store
use std::path::Path;
use std::sync::Arc;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::helpers::{check_file_size, parser_from_settings};
use crate::config::settings::EngineSettings;
use crate::data::column_mapping::ColumnMapping;
use crate::data::record_store::RecordStore;
use crate::error::EngineResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub import_id: Uuid,
    pub records_loaded: usize,
    pub message: String,
}

/// Parses the whole file and only then publishes it. Any failure leaves the
/// store holding the previous collection.
pub async fn handle_load_csv_data(
    file_path: &Path,
    mapping: &ColumnMapping,
    settings: &EngineSettings,
    record_store: Arc<RwLock<RecordStore>>,
) -> EngineResult<ImportSummary> {
    let import_id = Uuid::new_v4();
    mapping.ensure_complete()?;

    for (header, fields) in mapping.collisions() {
        tracing::warn!(%import_id, header, ?fields, "Several fields read the same CSV column");
    }

    check_file_size(file_path, settings).await?;
    let parser = parser_from_settings(settings)?;
    let records = parser.ingest_csv_with_mapping(file_path, mapping).await?;

    let records_loaded = records.len();
    record_store.write().await.replace(records);
    tracing::debug!(%import_id, records_loaded, "Published new record collection");

    Ok(ImportSummary {
        import_id,
        records_loaded,
        message: format!("{} registros importados com sucesso!", records_loaded),
    })
}
