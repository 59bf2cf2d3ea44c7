//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub input: InputConfig,
}

/// Input backend configuration
#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// Pin the backend to a single device node instead of scanning.
    /// Empty means auto-detect.
    #[serde(default)]
    pub device_path: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_rescan_interval_ms")]
    pub rescan_interval_ms: u64,
}

// Default value functions
fn default_poll_interval_ms() -> u64 { 4 }
fn default_rescan_interval_ms() -> u64 { 1000 }

impl Default for Config {
    fn default() -> Self {
        Self {
            input: InputConfig {
                device_path: String::new(),
                poll_interval_ms: default_poll_interval_ms(),
                rescan_interval_ms: default_rescan_interval_ms(),
            },
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use padhub::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Returns
    ///
    /// * `Result<()>` - Ok if valid, Err if invalid
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        // Input device_path can be empty (auto-detect)

        if self.input.poll_interval_ms == 0 || self.input.poll_interval_ms > 1000 {
            return Err(crate::error::PadHubError::Config(
                toml::de::Error::custom("poll_interval_ms must be between 1 and 1000")
            ));
        }

        if self.input.rescan_interval_ms == 0 || self.input.rescan_interval_ms > 60000 {
            return Err(crate::error::PadHubError::Config(
                toml::de::Error::custom("rescan_interval_ms must be between 1 and 60000")
            ));
        }

        // Rescanning more often than polling makes no sense.
        if self.input.rescan_interval_ms < self.input.poll_interval_ms {
            return Err(crate::error::PadHubError::Config(
                toml::de::Error::custom("rescan_interval_ms must not be less than poll_interval_ms")
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.input.device_path.is_empty());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[input]
device_path = "/dev/input/event7"
poll_interval_ms = 8
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.input.device_path, "/dev/input/event7");
        assert_eq!(config.input.poll_interval_ms, 8);
        assert_eq!(config.input.rescan_interval_ms, 1000);
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(Config::load("/nonexistent/padhub.toml").is_err());
    }

    #[test]
    fn test_load_config_bad_toml() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"not [valid toml").unwrap();
        temp_file.flush().unwrap();

        assert!(Config::load(temp_file.path()).is_err());
    }

    #[test]
    fn test_poll_interval_zero() {
        let mut config = Config::default();
        config.input.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_too_high() {
        let mut config = Config::default();
        config.input.poll_interval_ms = 1001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rescan_interval_zero() {
        let mut config = Config::default();
        config.input.rescan_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rescan_interval_too_high() {
        let mut config = Config::default();
        config.input.rescan_interval_ms = 60001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rescan_faster_than_poll() {
        let mut config = Config::default();
        config.input.poll_interval_ms = 10;
        config.input.rescan_interval_ms = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_poll_interval_ms(), 4);
        assert_eq!(default_rescan_interval_ms(), 1000);
    }
}
