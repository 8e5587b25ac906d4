use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::protocol::FrameProfile;
use crate::types::ConnectionMode;
use crate::waveform::WindowConfig;
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub mode: ConnectionMode,
    pub host: String,
    pub port: u16,
    pub serial_path: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    /// Packet rate of the simulated device.
    pub simulation_rate_hz: f64,
}
impl ConnectionConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}
impl Default for ConnectionConfig {
    fn default() -> Self {
        // The wearable runs its own access point and serves on 192.168.4.1:9000.
        Self {
            mode: ConnectionMode::Tcp,
            host: "192.168.4.1".to_owned(),
            port: 9000,
            serial_path: "/dev/ttyUSB0".to_owned(),
            baud_rate: 115_200,
            read_timeout_ms: 20,
            simulation_rate_hz: 100.0,
        }
    }
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub connection: ConnectionConfig,
    pub profile: FrameProfile,
    pub window: WindowConfig,
    /// Lines kept in the raw-input panel.
    pub raw_log_lines: usize,
}
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            profile: FrameProfile::Extended,
            window: WindowConfig::default(),
            raw_log_lines: 200,
        }
    }
}
impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.window.width_secs > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "window.width_secs must be positive, got {}",
                self.window.width_secs
            )));
        }
        if !(self.window.min_spacing_secs >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "window.min_spacing_secs must not be negative, got {}",
                self.window.min_spacing_secs
            )));
        }
        if !(self.window.retention_secs >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "window.retention_secs must not be negative, got {}",
                self.window.retention_secs
            )));
        }
        if !(self.connection.simulation_rate_hz > 0.0) {
            return Err(ConfigError::Invalid(
                "connection.simulation_rate_hz must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}
pub fn load(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    AppConfig::from_json(&text)
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn empty_object_gives_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.window.width_secs, 8.0);
        assert_eq!(config.connection.port, 9000);
    }
    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = AppConfig::from_json(
            r#"{
                "connection": { "mode": "simulation" },
                "profile": "simple",
                "window": { "min_spacing_secs": 0.002 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.connection.mode, ConnectionMode::Simulation);
        assert_eq!(config.connection.host, "192.168.4.1");
        assert_eq!(config.profile, FrameProfile::Simple);
        assert_eq!(config.window.min_spacing_secs, 0.002);
        assert_eq!(config.window.width_secs, 8.0);
    }
    #[test]
    fn rejects_bad_window() {
        let err = AppConfig::from_json(r#"{ "window": { "width_secs": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = AppConfig::from_json(r#"{ "window": { "min_spacing_secs": -1 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
    #[test]
    fn rejects_unknown_profile() {
        let err = AppConfig::from_json(r#"{ "profile": "v3" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
    #[test]
    fn missing_file_reports_path() {
        let err = load("/nonexistent/tapscope.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tapscope.json"));
    }
}
