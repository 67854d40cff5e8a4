use log::{debug, error, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{OriginError, Result};
use crate::timestamp::TimestampType;

/// Client configuration for one origin collector
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Collector host name or address
    pub server: String,
    /// Registration (request/reply) port
    pub register_port: u16,
    /// Measurement (push) port
    pub measure_port: u16,
    /// Full registration endpoint, overrides `server`/`register_port`
    pub register_endpoint: Option<String>,
    /// Full measurement endpoint, overrides `server`/`measure_port`
    pub measure_endpoint: Option<String>,
    /// Milliseconds to wait for a registration reply; `None` waits forever
    pub request_timeout_ms: Option<u64>,
    /// Milliseconds a send may block before failing; `None` waits forever
    pub send_timeout_ms: Option<u64>,
    /// Milliseconds queued messages may linger after close
    pub linger_ms: u64,
    /// Timestamp encoding for `sample_now`
    pub timestamp_type: TimestampType,
    /// Logging level
    pub log_level: LogLevel,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: "127.0.0.1".to_string(),
            register_port: 5556,
            measure_port: 5557,
            register_endpoint: None,
            measure_endpoint: None,
            request_timeout_ms: Some(5_000),
            send_timeout_ms: Some(5_000),
            linger_ms: 1_000,
            timestamp_type: TimestampType::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl ClientConfig {
    /// Endpoint of the registration channel
    pub fn register_endpoint(&self) -> String {
        self.register_endpoint
            .clone()
            .unwrap_or_else(|| format!("tcp://{}:{}", self.server, self.register_port))
    }

    /// Endpoint of the measurement channel
    pub fn measure_endpoint(&self) -> String {
        self.measure_endpoint
            .clone()
            .unwrap_or_else(|| format!("tcp://{}:{}", self.server, self.measure_port))
    }

    /// Deadline for a registration reply
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Deadline for queueing an outbound message
    pub fn send_timeout(&self) -> Option<Duration> {
        self.send_timeout_ms.map(Duration::from_millis)
    }

    /// Linger period applied when sockets close
    pub fn linger(&self) -> Duration {
        Duration::from_millis(self.linger_ms)
    }
}

/// Logging level
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

/// Source of configuration
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// File path, format taken from the extension. A missing optional file
    /// is skipped; a missing required file fails the build.
    File { path: PathBuf, required: bool },
    /// Environment variables with a prefix
    Environment(String),
    /// TOML string
    Toml(String),
    /// Built-in defaults only
    Defaults,
}

/// Layered configuration builder; later sources override earlier ones
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    sources: Vec<ConfigSource>,
}

impl ConfigBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an optional configuration file; a missing file is skipped with a warning
    pub fn add_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources.push(ConfigSource::File {
            path: path.as_ref().to_path_buf(),
            required: false,
        });
        self
    }

    /// Add a configuration file that must exist
    pub fn require_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources.push(ConfigSource::File {
            path: path.as_ref().to_path_buf(),
            required: true,
        });
        self
    }

    /// Add environment variables, e.g. `ORIGIN__SERVER` for prefix `ORIGIN`
    pub fn add_env(mut self, prefix: impl Into<String>) -> Self {
        self.sources.push(ConfigSource::Environment(prefix.into()));
        self
    }

    /// Add a TOML string
    pub fn add_toml(mut self, toml: impl Into<String>) -> Self {
        self.sources.push(ConfigSource::Toml(toml.into()));
        self
    }

    /// Use default values
    pub fn use_defaults(mut self) -> Self {
        self.sources.push(ConfigSource::Defaults);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ClientConfig> {
        let mut builder = config::Config::builder();

        for source in self.sources {
            match source {
                ConfigSource::File { path, required } => {
                    if !path.exists() {
                        if required {
                            error!("Configuration file {} does not exist", path.display());
                            return Err(OriginError::Config(format!(
                                "Configuration file not found: {}",
                                path.display()
                            )));
                        }
                        warn!("Skipping missing configuration file: {}", path.display());
                        continue;
                    }
                    let format = file_format(&path)?;
                    debug!("Loading configuration from file: {}", path.display());
                    builder = builder.add_source(config::File::from(path).format(format));
                }
                ConfigSource::Environment(prefix) => {
                    debug!("Loading configuration from environment with prefix: {}", prefix);
                    builder = builder.add_source(
                        config::Environment::with_prefix(&prefix)
                            .prefix_separator("__")
                            .separator("__")
                            .try_parsing(true),
                    );
                }
                ConfigSource::Toml(toml_str) => {
                    debug!("Loading configuration from TOML string");
                    builder = builder
                        .add_source(config::File::from_str(&toml_str, config::FileFormat::Toml));
                }
                ConfigSource::Defaults => {
                    debug!("Using default configuration values");
                }
            }
        }

        let config = builder
            .build()
            .map_err(|e| OriginError::Config(format!("Failed to build configuration: {}", e)))?;

        let result: ClientConfig = config
            .try_deserialize()
            .map_err(|e| OriginError::Config(format!("Failed to deserialize configuration: {}", e)))?;

        debug!("Configuration loaded successfully: {:?}", result);
        Ok(result)
    }
}

/// Pick the parser for a configuration file from its extension
fn file_format(path: &Path) -> Result<config::FileFormat> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());

    match extension.as_deref() {
        Some("toml") => Ok(config::FileFormat::Toml),
        Some("json") => Ok(config::FileFormat::Json),
        Some("yaml" | "yml") => Ok(config::FileFormat::Yaml),
        other => {
            error!("Cannot load configuration from {}", path.display());
            Err(OriginError::Config(format!(
                "Unsupported config format {:?}: {}",
                other.unwrap_or("<none>"),
                path.display()
            )))
        }
    }
}

/// Load client configuration from a single file that must exist
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ClientConfig> {
    debug!("Loading configuration from {}", path.as_ref().display());
    ConfigBuilder::new().require_file(path).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn defaults_point_at_local_collector() {
        let config = ConfigBuilder::new().use_defaults().build().unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.register_endpoint(), "tcp://127.0.0.1:5556");
        assert_eq!(config.measure_endpoint(), "tcp://127.0.0.1:5557");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn load_from_toml_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            server = "collector.lab"
            register_port = 6000
            request_timeout_ms = 250
            timestamp_type = "seconds"
            log_level = "debug"
        "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.register_endpoint(), "tcp://collector.lab:6000");
        assert_eq!(config.measure_endpoint(), "tcp://collector.lab:5557");
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.timestamp_type, TimestampType::Seconds);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn explicit_endpoints_override_host_and_port() {
        let config = ConfigBuilder::new()
            .add_toml(
                r#"
                server = "ignored"
                register_endpoint = "ipc:///tmp/origin-reg"
                measure_endpoint = "tcp://10.0.0.2:7000"
                "#,
            )
            .build()
            .unwrap();

        assert_eq!(config.register_endpoint(), "ipc:///tmp/origin-reg");
        assert_eq!(config.measure_endpoint(), "tcp://10.0.0.2:7000");
    }

    #[test]
    fn later_sources_win() {
        let config = ConfigBuilder::new()
            .add_toml("server = \"first\"\nmeasure_port = 1")
            .add_toml("server = \"second\"")
            .build()
            .unwrap();

        assert_eq!(config.server, "second");
        assert_eq!(config.measure_port, 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_config("/nonexistent/origin.toml").unwrap_err();
        assert!(matches!(err, OriginError::Config(_)));
    }

    #[test]
    fn missing_optional_file_falls_back_to_defaults() {
        let config = ConfigBuilder::new()
            .add_file("/nonexistent/origin.toml")
            .add_toml("measure_port = 7001")
            .build()
            .unwrap();

        assert_eq!(config.server, "127.0.0.1");
        assert_eq!(config.measure_port, 7001);
    }

    #[test]
    fn missing_required_file_fails_builder() {
        let result = ConfigBuilder::new()
            .use_defaults()
            .require_file("/nonexistent/origin.toml")
            .build();
        assert!(matches!(result, Err(OriginError::Config(_))));
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let file = Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(matches!(load_config(file.path()), Err(OriginError::Config(_))));
    }

    #[test]
    fn uint64_alias_selects_fixed_point() {
        let config = ConfigBuilder::new()
            .add_toml("timestamp_type = \"uint64\"")
            .build()
            .unwrap();
        assert_eq!(config.timestamp_type, TimestampType::FixedPoint);
    }
}
