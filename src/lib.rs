pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod forecast;
pub mod observability;
pub mod resample;
pub mod scheduler;
pub mod source;
pub mod types;
pub mod utils;

/// Environment variable selecting the `config/{env}` overlay.
pub const ENV_VAR: &str = "DAYAHEAD_ENV";
