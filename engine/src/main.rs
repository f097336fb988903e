// NDF quote analytics engine entry point
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ndf_engine::config::settings::EngineSettings;
use ndf_engine::data::column_mapping::{CanonicalField, ColumnMapping};
use ndf_engine::data::record_store::RecordStore;
use ndf_engine::services::import_service::NdfImportService;
use ndf_shared::utils::brazilian_format;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "ndf-engine", version, about = "Import and summarize NDF quote CSV exports")]
struct Cli {
    /// JSON settings file; built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show detected columns and the suggested field mapping
    Inspect { csv: PathBuf },
    /// Import a CSV and print the dashboard KPIs
    Import {
        csv: PathBuf,
        /// JSON object of field key -> CSV header; the standard export layout when omitted
        #[arg(long)]
        mapping: Option<PathBuf>,
    },
}

fn load_mapping(path: &Path) -> anyhow::Result<ColumnMapping> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading mapping file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing mapping file {}", path.display()))
}

async fn inspect(service: &NdfImportService, csv: &Path) -> anyhow::Result<()> {
    let preview = service.inspect_csv(csv).await?;
    println!("{} colunas, {} linhas", preview.columns.len(), preview.total_rows);
    for column in &preview.columns {
        println!("  {}", column);
    }

    println!("\nMapeamento sugerido:");
    for field in CanonicalField::ALL {
        let header = preview.suggested_mapping.header_for(field).unwrap_or("-");
        let marker = if field.is_required() { "*" } else { " " };
        println!("  {}{:<22} <- {}", marker, field.key(), header);
    }

    let missing = preview.suggested_mapping.missing_required();
    if !missing.is_empty() {
        let labels: Vec<&str> = missing.iter().map(|field| field.label()).collect();
        println!("\nCampos obrigatórios não mapeados: {}", labels.join(", "));
    }
    Ok(())
}

async fn import(service: &NdfImportService, csv: &Path, mapping: Option<&Path>) -> anyhow::Result<()> {
    let summary = match mapping {
        Some(path) => {
            let mapping = load_mapping(path)?;
            service.load_csv_data_with_mapping(csv, &mapping).await?
        }
        None => service.load_csv_data(csv).await?,
    };
    println!("{}", summary.message);

    let dashboard = service.dashboard_summary().await;
    let kpis = dashboard.kpis;
    println!("Volume total:      {}", brazilian_format::format_millions(kpis.volume_total));
    println!("Resultado total:   {}", brazilian_format::format_brl(kpis.result_total));
    println!("Markup médio:      {}", brazilian_format::format_bps(kpis.markup_avg_bps));
    println!("Prazo médio:       {} dias", brazilian_format::format_decimal(kpis.weighted_tenor_days, 1));
    println!("Taxa de conversão: {}", brazilian_format::format_percentage(kpis.conversion_rate, 1));

    if !dashboard.result_by_currency.is_empty() {
        println!("\nResultado por moeda:");
        for entry in &dashboard.result_by_currency {
            println!("  {:<10} {}", entry.currency, brazilian_format::format_thousands(entry.value_thousands * 1_000.0));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => EngineSettings::load_from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => EngineSettings::default(),
    };
    info!(home_currency = %settings.home_currency, "Starting NDF engine");

    let record_store = Arc::new(RwLock::new(RecordStore::new()));
    let service = NdfImportService::new(record_store, settings);

    match &cli.command {
        Command::Inspect { csv } => inspect(&service, csv).await,
        Command::Import { csv, mapping } => import(&service, csv, mapping.as_deref()).await,
    }
}
