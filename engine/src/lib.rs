// Engine library root: ingestion of NDF quote exports and the dashboard
// aggregations computed over them.

pub mod analytics;
pub mod config;
pub mod data;
pub mod error;
pub mod services;
