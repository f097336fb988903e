// Handler for column detection ahead of the mapping step
use std::path::Path;

use super::helpers::{check_file_size, parser_from_settings};
use crate::config::settings::EngineSettings;
use crate::data::csv_parser::CsvPreview;
use crate::error::EngineResult;

pub async fn handle_inspect_csv(file_path: &Path, settings: &EngineSettings) -> EngineResult<CsvPreview> {
    check_file_size(file_path, settings).await?;
    let parser = parser_from_settings(settings)?;
    let bytes = tokio::fs::read(file_path).await?;
    let preview = parser.inspect(bytes.as_slice(), settings.preview_rows)?;
    tracing::debug!(
        columns = preview.columns.len(),
        total_rows = preview.total_rows,
        suggested = preview.suggested_mapping.mapped().count(),
        "Detected CSV columns"
    );
    Ok(preview)
}
