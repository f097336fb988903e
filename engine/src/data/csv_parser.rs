use csv::{ByteRecord, ReaderBuilder, StringRecord};
use ndf_shared::models::NdfRecord;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::data::column_mapping::{ColumnMapping, RawRow, ResolvedColumns};
use crate::data::normalizer::RowNormalizer;
use crate::error::EngineResult;

// Module for Brazilian number and date/time format handling
pub mod brazilian_format {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    /// A cell that is either still text or already numeric.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum NumericCell<'a> {
        Text(&'a str),
        Number(f64),
    }

    impl<'a> From<&'a str> for NumericCell<'a> {
        fn from(text: &'a str) -> Self {
            NumericCell::Text(text)
        }
    }

    impl From<f64> for NumericCell<'_> {
        fn from(value: f64) -> Self {
            NumericCell::Number(value)
        }
    }

    /// Parses "1.234.567,89" into 1234567.89.
    ///
    /// Every `.` is a thousands separator and the first `,` becomes the
    /// decimal point; no other locale is guessed. Blank cells and `-` are
    /// `None`, as is anything without a leading number.
    pub fn parse_locale_number<'a>(value: impl Into<NumericCell<'a>>) -> Option<f64> {
        let text = match value.into() {
            NumericCell::Number(number) => return Some(number),
            NumericCell::Text(text) => text,
        };
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "-" {
            return None;
        }

        let normalized = text.replace('.', "").replacen(',', ".", 1);
        parse_leading_float(&normalized)
    }

    // Longest numeric prefix, so "12,5%" still reads as 12.5
    fn parse_leading_float(text: &str) -> Option<f64> {
        let text = text.trim_start();
        let bytes = text.as_bytes();
        let mut end = 0;

        if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
            end += 1;
        }
        if text[end..].starts_with("Infinity") {
            let infinity = if bytes.first() == Some(&b'-') { f64::NEG_INFINITY } else { f64::INFINITY };
            return Some(infinity);
        }

        let int_digits = count_digits(&bytes[end..]);
        end += int_digits;
        let mut frac_digits = 0;
        if bytes.get(end) == Some(&b'.') {
            frac_digits = count_digits(&bytes[end + 1..]);
            if int_digits > 0 || frac_digits > 0 {
                end += 1 + frac_digits;
            }
        }
        if int_digits == 0 && frac_digits == 0 {
            return None;
        }

        if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
            let mut exp_end = end + 1;
            if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
                exp_end += 1;
            }
            let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
            if exp_digits > 0 {
                end = exp_end + exp_digits;
            }
        }

        text[..end].parse::<f64>().ok()
    }

    fn count_digits(bytes: &[u8]) -> usize {
        bytes.iter().take_while(|b| b.is_ascii_digit()).count()
    }

    const NAIVE_DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    /// Parses ISO-like timestamps. Values without an offset are taken as UTC.
    pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.with_timezone(&Utc));
        }
        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

}

/// Header row plus a sample of the first rows, for the mapping step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvPreview {
    pub columns: Vec<String>,
    pub preview: Vec<Vec<String>>,
    pub total_rows: usize,
    pub suggested_mapping: ColumnMapping,
}

/// Ingestion driver: reads delimited text with a header row and normalizes
/// every data row, in file order.
pub struct NdfCsvParser {
    delimiter: u8,
    normalizer: RowNormalizer,
}

impl NdfCsvParser {
    pub fn new(delimiter: u8, normalizer: RowNormalizer) -> Self {
        Self { delimiter, normalizer }
    }

    fn reader<R: Read>(&self, source: R) -> csv::Reader<R> {
        ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true) // Ragged rows read as missing trailing fields
            .from_reader(source)
    }

    /// Any structural CSV error aborts the whole parse; no partial result is
    /// returned. Row-level anomalies never fail.
    pub fn parse_records<R: Read>(&self, source: R, mapping: &ColumnMapping) -> EngineResult<Vec<NdfRecord>> {
        let mut rdr = self.reader(source);
        let headers = decode_lossy(rdr.byte_headers()?);
        let columns = ResolvedColumns::resolve(&headers, mapping);
        debug!(columns = headers.len(), mapped = mapping.mapped().count(), "Resolved CSV columns");

        let mut records = Vec::new();
        let mut raw = ByteRecord::new();
        while rdr.read_byte_record(&mut raw)? {
            let record = decode_lossy(&raw);
            records.push(self.normalizer.normalize(&RawRow::new(&columns, &record)));
        }
        Ok(records)
    }

    pub fn load_records_from_csv(&self, file_path: &Path, mapping: &ColumnMapping) -> EngineResult<Vec<NdfRecord>> {
        let file = std::fs::File::open(file_path)?;
        self.parse_records(std::io::BufReader::new(file), mapping)
    }

    /// Reads the file off the async runtime's I/O and normalizes it with the
    /// standard export headers.
    pub async fn ingest_csv(&self, file_path: &Path) -> EngineResult<Vec<NdfRecord>> {
        self.ingest_csv_with_mapping(file_path, &ColumnMapping::fixed_schema()).await
    }

    pub async fn ingest_csv_with_mapping(&self, file_path: &Path, mapping: &ColumnMapping) -> EngineResult<Vec<NdfRecord>> {
        let bytes = tokio::fs::read(file_path).await?;
        self.parse_records(bytes.as_slice(), mapping)
    }

    pub fn inspect<R: Read>(&self, source: R, preview_rows: usize) -> EngineResult<CsvPreview> {
        let mut rdr = self.reader(source);
        let columns: Vec<String> = decode_lossy(rdr.byte_headers()?).iter().map(str::to_string).collect();

        let mut preview = Vec::new();
        let mut total_rows = 0;
        let mut raw = ByteRecord::new();
        while rdr.read_byte_record(&mut raw)? {
            if preview.len() < preview_rows {
                preview.push(decode_lossy(&raw).iter().map(str::to_string).collect());
            }
            total_rows += 1;
        }

        let suggested_mapping = ColumnMapping::suggest(columns.iter().map(String::as_str));
        Ok(CsvPreview {
            columns,
            preview,
            total_rows,
            suggested_mapping,
        })
    }
}

// Exports saved as Windows-1252 carry non-UTF-8 bytes; such cells keep
// U+FFFD in place of the bad bytes instead of failing the file.
fn decode_lossy(raw: &ByteRecord) -> StringRecord {
    raw.iter().map(String::from_utf8_lossy).collect()
}

impl Default for NdfCsvParser {
    fn default() -> Self {
        Self::new(b',', RowNormalizer::default())
    }
}
