// Helper functions shared by the import service handlers
use std::path::Path;

use crate::config::settings::EngineSettings;
use crate::data::csv_parser::NdfCsvParser;
use crate::data::normalizer::RowNormalizer;
use crate::error::{EngineError, EngineResult};

pub fn parser_from_settings(settings: &EngineSettings) -> EngineResult<NdfCsvParser> {
    let delimiter = settings.delimiter_byte()?;
    Ok(NdfCsvParser::new(delimiter, RowNormalizer::new(settings.home_currency.clone())))
}

/// Rejects uploads above the configured size guideline before reading them.
pub async fn check_file_size(file_path: &Path, settings: &EngineSettings) -> EngineResult<()> {
    let size = tokio::fs::metadata(file_path).await?.len();
    if size > settings.max_file_size_bytes() {
        return Err(EngineError::FileTooLarge {
            path: file_path.display().to_string(),
            size_mb: size as f64 / (1024.0 * 1024.0),
            limit_mb: settings.max_file_size_mb,
        });
    }
    Ok(())
}
