// Aggregations over normalized records, consumed by dashboard charts
pub mod kpis;
pub mod overview;
pub mod tenor;

use ndf_shared::models::NdfRecord;

// Common trait for every dashboard aggregation
pub trait Aggregation: Send + Sync {
    type Output;

    fn name(&self) -> &str;
    fn compute(&self, records: &[NdfRecord]) -> Self::Output;
}

#[cfg(test)]
pub(crate) mod testkit {
    use crate::data::normalizer::RowNormalizer;
    use csv::StringRecord;
    use ndf_shared::models::{NdfRecord, NotionalBucket, Status, TenorBucket};

    /// A record with every field at its empty default.
    pub fn blank() -> NdfRecord {
        RowNormalizer::default().normalize_row(&StringRecord::new(), &StringRecord::new())
    }

    pub fn quote(status: Status, notional: f64, is_buy: bool, tenor_dc: Option<i64>) -> NdfRecord {
        NdfRecord {
            is_actionable: status.is_actionable(),
            status,
            notional,
            notional_bucket: NotionalBucket::from_notional(notional),
            is_buy,
            tenor_dc,
            tenor_bucket: TenorBucket::from_tenor(tenor_dc),
            ..blank()
        }
    }
}
