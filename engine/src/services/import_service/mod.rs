// The import service owns the record store and dispatches to one handler
// module per operation.
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::settings::EngineSettings;
use crate::data::column_mapping::ColumnMapping;
use crate::data::csv_parser::CsvPreview;
use crate::data::record_store::RecordStore;
use crate::error::EngineResult;

pub mod dashboard_summary;
pub mod helpers;
pub mod inspect_csv;
pub mod load_csv_data;

pub use dashboard_summary::DashboardSummary;
pub use load_csv_data::ImportSummary;

pub struct NdfImportService {
    record_store: Arc<RwLock<RecordStore>>,
    settings: EngineSettings,
}

impl NdfImportService {
    pub fn new(record_store: Arc<RwLock<RecordStore>>, settings: EngineSettings) -> Self {
        NdfImportService { record_store, settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn record_store(&self) -> Arc<RwLock<RecordStore>> {
        self.record_store.clone()
    }

    /// Loads a file exported with the fixed column names.
    pub async fn load_csv_data(&self, file_path: &Path) -> EngineResult<ImportSummary> {
        self.load_csv_data_with_mapping(file_path, &ColumnMapping::fixed_schema()).await
    }

    pub async fn load_csv_data_with_mapping(
        &self,
        file_path: &Path,
        mapping: &ColumnMapping,
    ) -> EngineResult<ImportSummary> {
        tracing::info!(
            path = %file_path.display(),
            mapped_fields = mapping.mapped().count(),
            "Received CSV import, dispatching to handler."
        );
        match load_csv_data::handle_load_csv_data(file_path, mapping, &self.settings, self.record_store.clone()).await
        {
            Ok(summary) => {
                tracing::info!(
                    import_id = %summary.import_id,
                    records_loaded = summary.records_loaded,
                    "CSV import finished"
                );
                Ok(summary)
            }
            Err(e) => {
                tracing::error!(path = %file_path.display(), error_detail = %e, "CSV import failed");
                Err(e)
            }
        }
    }

    pub async fn inspect_csv(&self, file_path: &Path) -> EngineResult<CsvPreview> {
        tracing::info!(path = %file_path.display(), "Inspecting CSV columns");
        inspect_csv::handle_inspect_csv(file_path, &self.settings).await.map_err(|e| {
            tracing::error!(path = %file_path.display(), error_detail = %e, "CSV inspection failed");
            e
        })
    }

    pub async fn dashboard_summary(&self) -> DashboardSummary {
        // Clone the snapshot so aggregations never hold the lock.
        let records = self.record_store.read().await.snapshot();
        dashboard_summary::handle_dashboard_summary(&records)
    }

    pub async fn clear(&self) {
        self.record_store.write().await.clear();
        tracing::info!("Record store cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::column_mapping::CanonicalField;
    use crate::error::EngineError;
    use ndf_shared::models::Status;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FIXED_CSV: &str = "\
Status,Currency,Notional,FWD-Client,FWD,RFQ Timestamp,Maturity Date,Side,Counterparty,Rejected message
DEAL,USD,\"1.000.000,00\",\"5,2500\",\"5,0000\",2024-01-10T10:00:00Z,2024-02-09T00:00:00Z,BUY,Cliente A,
REJECTED,USD,\"500.000,00\",,,2024-01-10T11:00:00Z,2024-04-10T00:00:00Z,SELL,Cliente B,Limite excedido
,EUR,\"250.000,00\",,,2024-01-11T09:00:00Z,2024-01-25T00:00:00Z,SELL,Cliente C,
";

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn service() -> NdfImportService {
        NdfImportService::new(Arc::new(RwLock::new(RecordStore::new())), EngineSettings::default())
    }

    #[tokio::test]
    async fn test_load_csv_data_publishes_records() {
        let file = csv_file(FIXED_CSV);
        let service = service();

        let summary = service.load_csv_data(file.path()).await.unwrap();
        assert_eq!(summary.records_loaded, 3);
        assert_eq!(summary.message, "3 registros importados com sucesso!");

        let store = service.record_store();
        let snapshot = store.read().await.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].status, Status::Deal);
        assert_eq!(snapshot[2].status, Status::Quote);
    }

    #[tokio::test]
    async fn test_failed_import_keeps_previous_collection() {
        let file = csv_file(FIXED_CSV);
        let service = service();
        service.load_csv_data(file.path()).await.unwrap();
        let generation = service.record_store().read().await.generation();

        let mut partial = ColumnMapping::new();
        partial.assign(CanonicalField::Status, "Status");
        let err = service.load_csv_data_with_mapping(file.path(), &partial).await.unwrap_err();
        assert!(matches!(err, EngineError::IncompleteMapping { .. }));

        let missing = service.load_csv_data(Path::new("/nonexistent/quotes.csv")).await;
        assert!(missing.is_err());

        let store = service.record_store();
        let guard = store.read().await;
        assert_eq!(guard.len(), 3);
        assert_eq!(guard.generation(), generation);
    }

    #[tokio::test]
    async fn test_inspect_suggests_fixed_headers() {
        let file = csv_file(FIXED_CSV);
        let preview = service().inspect_csv(file.path()).await.unwrap();
        assert_eq!(preview.columns.len(), 10);
        assert_eq!(preview.total_rows, 3);
        assert_eq!(preview.suggested_mapping.header_for(CanonicalField::Notional), Some("Notional"));
    }

    #[tokio::test]
    async fn test_dashboard_summary_and_clear() {
        let file = csv_file(FIXED_CSV);
        let service = service();
        service.load_csv_data(file.path()).await.unwrap();

        let summary = service.dashboard_summary().await;
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.kpis.volume_total, 1_000_000.0);
        assert_eq!(summary.kpis.conversion_rate, 1.0);
        assert_eq!(summary.heatmap.len(), 24);
        assert_eq!(summary.rejection_reasons[0].reason, "Limite excedido");

        service.clear().await;
        let empty = service.dashboard_summary().await;
        assert_eq!(empty.record_count, 0);
        assert!(empty.status_distribution.is_empty());
    }
}
