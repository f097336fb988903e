// End-to-end ingestion through the public engine API
use std::io::Write;
use std::sync::Arc;

use csv::StringRecord;
use ndf_engine::analytics::kpis::Kpis;
use ndf_engine::analytics::Aggregation;
use ndf_engine::config::settings::EngineSettings;
use ndf_engine::data::column_mapping::{CanonicalField, ColumnMapping};
use ndf_engine::data::csv_parser::NdfCsvParser;
use ndf_engine::data::normalizer::RowNormalizer;
use ndf_engine::data::record_store::RecordStore;
use ndf_engine::services::import_service::NdfImportService;
use ndf_shared::models::{Status, TenorBucket};
use tempfile::NamedTempFile;
use tokio::sync::RwLock;

const HEADER: &str = "RFQ Timestamp,Maturity Date,Status,Rejected message,Counterparty,Currency,Parity,Notional,Spot FX,FWD,FWD-Client,Side";

fn csv_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

fn approx(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|value| (value - expected).abs() < 1e-6)
}

#[tokio::test]
async fn three_row_export_converts_only_the_deal() {
    let file = csv_file(&[
        "2024-05-02 10:00:00,2024-06-03,DEAL,,Cliente A,USD,USD/BRL,\"1.000,00\",\"5,00\",\"5,00\",\"5,10\",BUY",
        "2024-05-02 11:00:00,2024-08-01,REJECTED,Limite excedido,Cliente B,USD,USD/BRL,\"2.000,00\",,,,SELL",
        "2024-05-02 12:00:00,2024-07-01,QUOTE,,Cliente C,EUR,EUR/BRL,\"3.000,00\",,,,BUY",
    ]);

    let records = NdfCsvParser::default().ingest_csv(file.path()).await.unwrap();
    assert_eq!(records.len(), 3);

    let actionable: Vec<Status> = records
        .iter()
        .filter(|r| r.is_actionable)
        .map(|r| r.status.clone())
        .collect();
    assert_eq!(actionable, vec![Status::Deal]);
    assert_eq!(records[1].rejected_message, "Limite excedido");

    let kpis = Kpis.compute(&records);
    assert_eq!(kpis.conversion_rate, 1.0);
    assert_eq!(kpis.volume_total, 1_000.0);
    assert!(approx(records[0].pl_brl, 100.0));
    assert!(approx(records[0].markup_bps, 200.0));
}

#[tokio::test]
async fn malformed_maturity_degrades_without_aborting() {
    let file = csv_file(&[
        "2024-05-02 10:00:00,not a date,DEAL,,Cliente A,USD,USD/BRL,\"1.000,00\",,,,BUY",
        "2024-05-02 10:00:00,2024-05-31 10:00:00,QUOTE,,Cliente B,USD,USD/BRL,abc,,,,VENDA",
    ]);

    let records = NdfCsvParser::default().ingest_csv(file.path()).await.unwrap();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].tenor_dc, None);
    assert_eq!(records[0].tenor_bucket, TenorBucket::NotAvailable);
    assert_eq!(records[0].tenor_bucket.label(), "N/A");

    assert_eq!(records[1].tenor_dc, Some(29));
    assert_eq!(records[1].tenor_bucket.label(), "0-29D");
    assert_eq!(records[1].notional, 0.0);
    assert!(!records[1].is_buy);
}

#[test]
fn normalizing_twice_is_identical() {
    let headers = StringRecord::from(HEADER.split(',').collect::<Vec<_>>());
    let row = StringRecord::from(vec![
        "2024-05-02 10:00:00", "2024-09-30", "NOTH.DONE", "", "Cliente A", "USD", "USD/EUR",
        "250.000,00", "5,4321", "1,0800", "1,0900", "Venda",
    ]);
    let normalizer = RowNormalizer::default();
    let mapping = ColumnMapping::fixed_schema();

    let first = normalizer.normalize_row_with_mapping(&headers, &row, &mapping);
    let second = normalizer.normalize_row_with_mapping(&headers, &row, &mapping);
    assert_eq!(first, second);
    assert_eq!(first, normalizer.normalize_row(&headers, &row));

    // Sell on a non-BRL parity: (1.08 - 1.09) * 250_000 converted at the spot rate
    assert!(approx(first.pl_brl, -0.01 * 250_000.0 * 5.4321));
}

#[tokio::test]
async fn mapped_import_replaces_the_published_collection() {
    let mut custom = NamedTempFile::new().unwrap();
    writeln!(custom, "Quando,Vence,Situacao,Valor,Direcao").unwrap();
    writeln!(custom, "2024-01-01 09:00:00,2024-04-30,DEAL,\"600.000,00\",COMPRA").unwrap();
    writeln!(custom).unwrap();
    writeln!(custom, "2024-01-01 09:30:00,2024-05-30,EXP.QUOTE,\"10,00\",VENDA").unwrap();
    custom.flush().unwrap();

    let mut mapping = ColumnMapping::new();
    mapping.assign(CanonicalField::RfqTimestamp, "Quando");
    mapping.assign(CanonicalField::MaturityDate, "Vence");
    mapping.assign(CanonicalField::Status, "Situacao");
    mapping.assign(CanonicalField::Notional, "Valor");
    mapping.assign(CanonicalField::Side, "Direcao");

    let store = Arc::new(RwLock::new(RecordStore::new()));
    let service = NdfImportService::new(store.clone(), EngineSettings::default());

    let before = store.read().await.snapshot();
    let summary = service.load_csv_data_with_mapping(custom.path(), &mapping).await.unwrap();
    assert_eq!(summary.records_loaded, 2);
    assert!(before.is_empty());

    let records = store.read().await.snapshot();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].tenor_dc, Some(120));
    // Days 120-149 land in the 150-179D bucket
    assert_eq!(records[0].tenor_bucket.label(), "150-179D");
    assert_eq!(records[1].status, Status::ExpQuote);
    assert!(!records[1].is_actionable);
    assert_eq!(records[1].currency, "");
}
