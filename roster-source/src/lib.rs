//! ROSTER Source - HTTP access to the remote catalog.

pub mod config;
pub mod http;

pub use config::{SourceConfig, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_MS};
pub use http::HttpRecordSource;
