use thiserror::Error;

use crate::data::column_mapping::CanonicalField;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Column mapping incomplete, unmapped required fields: {}", format_fields(.missing))]
    IncompleteMapping { missing: Vec<CanonicalField> },

    #[error("File '{path}' is {size_mb:.2} MB, above the {limit_mb} MB limit")]
    FileTooLarge {
        path: String,
        size_mb: f64,
        limit_mb: u64,
    },

    #[error("Import wizard error: {0}")]
    WizardError(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

fn format_fields(fields: &[CanonicalField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type EngineResult<T> = Result<T, EngineError>;
