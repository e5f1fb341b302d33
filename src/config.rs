//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::retrieval::partition::DEFAULT_PREFIX_ROOT;
use crate::retrieval::query::{DEFAULT_EXCHANGE, DEFAULT_MAX_FILES};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which object store implementation to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Amazon S3 or an S3-compatible endpoint
    #[default]
    S3,
    /// Local directory laid out like the bucket (development)
    Local,
}

/// Object store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default = "default_bucket")]
    pub bucket: String,

    #[serde(default = "default_region")]
    pub region: String,

    /// Custom endpoint for S3-compatible stores
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub allow_http: bool,

    /// Static credentials; when absent the AWS default chain is used
    #[serde(default)]
    pub access_key_id: Option<String>,

    #[serde(default)]
    pub secret_access_key: Option<String>,

    /// Root directory for the `local` backend
    #[serde(default = "default_local_root")]
    pub local_root: String,
}

fn default_bucket() -> String {
    "ohlcv-pipeline".to_string()
}

fn default_region() -> String {
    "ap-south-1".to_string()
}

fn default_local_root() -> String {
    "./bucket".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            bucket: default_bucket(),
            region: default_region(),
            endpoint: None,
            allow_http: false,
            access_key_id: None,
            secret_access_key: None,
            local_root: default_local_root(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Deadline for a whole retrieval, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Retrieval defaults applied when a request leaves them out
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_exchange")]
    pub default_exchange: String,

    #[serde(default = "default_max_files")]
    pub default_max_files: usize,

    /// First path segment of the partition tree
    #[serde(default = "default_prefix_root")]
    pub prefix_root: String,
}

fn default_exchange() -> String {
    DEFAULT_EXCHANGE.to_string()
}

fn default_max_files() -> usize {
    DEFAULT_MAX_FILES
}

fn default_prefix_root() -> String {
    DEFAULT_PREFIX_ROOT.to_string()
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_exchange: default_exchange(),
            default_max_files: default_max_files(),
            prefix_root: default_prefix_root(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` wins over the configured level.
    pub fn init_tracing(&self) {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("pricevault={},tower_http=info", self.level).into()
        });

        let fmt_layer = if self.format.eq_ignore_ascii_case("json") {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().boxed()
        };

        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(filter)
            .init();
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("pricevault").join("config.toml")),
            Some(PathBuf::from("/etc/pricevault/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Store overrides
        if let Ok(bucket) = std::env::var("S3_BUCKET") {
            self.store.bucket = bucket;
        }
        if let Ok(region) = std::env::var("AWS_REGION") {
            self.store.region = region;
        }
        if let Ok(endpoint) = std::env::var("AWS_ENDPOINT_URL") {
            self.store.endpoint = Some(endpoint);
        }
        if let Ok(key) = std::env::var("AWS_ACCESS_KEY_ID") {
            self.store.access_key_id = Some(key);
        }
        if let Ok(secret) = std::env::var("AWS_SECRET_ACCESS_KEY") {
            self.store.secret_access_key = Some(secret);
        }

        // API overrides
        if let Ok(host) = std::env::var("PRICEVAULT_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("PRICEVAULT_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("PRICEVAULT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PRICEVAULT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Pricevault Configuration
#
# Environment variables override these settings:
# - S3_BUCKET
# - AWS_REGION
# - AWS_ENDPOINT_URL
# - AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY
# - PRICEVAULT_API_HOST
# - PRICEVAULT_API_PORT
# - PRICEVAULT_LOG_LEVEL
# - PRICEVAULT_LOG_FORMAT

[store]
# Backend: s3 or local
backend = "s3"

# Bucket holding the processed/ partition tree
bucket = "ohlcv-pipeline"

# Bucket region
region = "ap-south-1"

# Custom endpoint for S3-compatible stores (MinIO, LocalStack)
# endpoint = "http://localhost:9000"
allow_http = false

# Directory used when backend = "local"
local_root = "./bucket"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8082

# Allowed CORS origins (empty = any)
cors_origins = []

# Deadline for a whole retrieval in seconds
request_timeout_secs = 30

[retrieval]
# Exchange used when a request does not name one
default_exchange = "NSE"

# File budget used when a request does not set max_files
default_max_files = 50

# First segment of partition keys
prefix_root = "processed"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.store.bucket, "ohlcv-pipeline");
        assert_eq!(config.store.backend, StoreBackend::S3);
        assert_eq!(config.api.port, 8082);
        assert_eq!(config.retrieval.default_max_files, 50);
        assert_eq!(config.retrieval.prefix_root, "processed");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[store]\nbackend = \"local\"\nlocal_root = \"/data\"\n\n[retrieval]\ndefault_exchange = \"BSE\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Local);
        assert_eq!(config.store.local_root, "/data");
        assert_eq!(config.store.region, "ap-south-1");
        assert_eq!(config.retrieval.default_exchange, "BSE");
        assert_eq!(config.retrieval.default_max_files, 50);
        assert_eq!(config.api.request_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nport = \"not a number\"").unwrap();

        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Config::load(Path::new("/definitely/not/here/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_api_addr() {
        assert_eq!(ApiConfig::new("127.0.0.1", 9000).addr(), "127.0.0.1:9000");
    }
}
