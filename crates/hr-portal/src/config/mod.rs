use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::applications::WriteStrategy;

const DEFAULT_BLOB_PUBLIC_URL: &str = "http://localhost:3000/files";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub store: StoreConfig,
    pub blobs: BlobConfig,
    pub write_strategy: WriteStrategy,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let store = match non_empty_var("STORE_URL") {
            Some(url) => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidStoreUrl(url));
                }
                StoreConfig::Rest {
                    base_url: url.trim_end_matches('/').to_string(),
                    auth_token: non_empty_var("STORE_AUTH_TOKEN"),
                }
            }
            None => StoreConfig::InMemory,
        };

        let blobs = BlobConfig {
            directory: non_empty_var("BLOB_DIR").map(PathBuf::from),
            public_url: non_empty_var("BLOB_PUBLIC_URL")
                .unwrap_or_else(|| DEFAULT_BLOB_PUBLIC_URL.to_string()),
        };

        let write_strategy = match non_empty_var("APPLY_WRITE_STRATEGY") {
            Some(raw) => WriteStrategy::parse(&raw).ok_or(ConfigError::InvalidWriteStrategy(raw))?,
            None => WriteStrategy::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            store,
            blobs,
            write_strategy,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Which realtime store backs the records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    InMemory,
    Rest {
        base_url: String,
        auth_token: Option<String>,
    },
}

/// Where uploaded applicant files land and how their URLs are formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobConfig {
    pub directory: Option<PathBuf>,
    pub public_url: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidStoreUrl(String),
    InvalidWriteStrategy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidStoreUrl(url) => {
                write!(f, "STORE_URL must be an http(s) URL, got '{url}'")
            }
            ConfigError::InvalidWriteStrategy(value) => write!(
                f,
                "APPLY_WRITE_STRATEGY must be 'dual' or 'multi_path', got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidStoreUrl(_)
            | ConfigError::InvalidWriteStrategy(_) => None,
        }
    }
}
