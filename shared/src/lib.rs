// Domain models and display helpers shared by the engine and any dashboard
// front end that consumes normalized NDF records.
pub mod models;
pub mod utils;
