// Services exposed to the CLI and to any embedding front end
pub mod import_service;
pub mod import_wizard;
