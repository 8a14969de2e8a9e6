use crate::config::ConfigError;
use crate::store::StoreError;
use crate::telemetry::TelemetryError;

/// Failure that ends a CLI command or the server process.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// A portal operation refused or failed outside of an HTTP handler.
    #[error("workflow error: {0}")]
    Workflow(String),
}
