use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;
use crate::game::COLS;

/// Top-level application configuration, loadable from TOML.
///
/// Board dimensions are compile-time constants and deliberately absent here.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ui: UiConfig,
    pub log: LogConfig,
}

/// Terminal front end settings.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Column the selector starts on (0-based).
    pub start_column: usize,
    /// How long to wait for a key press before redrawing.
    pub poll_interval_ms: u64,
    /// Pause between the final piece landing and the result announcement.
    pub end_game_delay_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            start_column: COLS / 2,
            poll_interval_ms: 100,
            end_game_delay_ms: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `connect_four=debug`.
    pub level: String,
    /// Log destination while the terminal UI owns the screen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "warn".to_string(),
            file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ui.start_column >= COLS {
            return Err(ConfigError::Validation(format!(
                "ui.start_column must be < {COLS}"
            )));
        }
        if self.ui.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "ui.poll_interval_ms must be > 0".into(),
            ));
        }
        if let Err(err) = EnvFilter::try_new(&self.log.level) {
            return Err(ConfigError::Validation(format!(
                "log.level '{}' is not a valid filter: {err}",
                self.log.level
            )));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
