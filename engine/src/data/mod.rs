pub mod column_mapping;
pub mod csv_parser;
pub mod derive;
pub mod normalizer;
pub mod record_store;
