//! Structured logging setup.
//!
//! The filter is chosen in this order of precedence:
//!
//! 1. an explicit override (the `--log-level` flag)
//! 2. the `RUST_LOG` environment variable
//! 3. `log.level` from the configuration file

use std::fs::File;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogConfig;
use crate::error::LoggingError;

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Headless runs log to stderr.
    Stderr,
    /// The terminal UI owns the screen, so logs go to `log.file` or nowhere.
    FileOnly,
}

/// Resolve the filter directive to use.
pub fn resolve_filter(level_override: Option<&str>, config: &LogConfig) -> String {
    level_override
        .map(str::to_string)
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| config.level.clone())
}

/// Install the global subscriber. Returns `Ok(false)` when no subscriber
/// was installed because there is nowhere to write.
pub fn init(
    level_override: Option<&str>,
    config: &LogConfig,
    target: LogTarget,
) -> Result<bool, LoggingError> {
    let directive = resolve_filter(level_override, config);
    let filter = EnvFilter::try_new(&directive).map_err(|source| LoggingError::Filter {
        filter: directive.clone(),
        source,
    })?;

    match (target, &config.file) {
        (LogTarget::FileOnly, None) => Ok(false),
        (_, Some(path)) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::FileOpen {
                    path: path.clone(),
                    source,
                })?;
            fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .map_err(|e| LoggingError::Init(e.to_string()))?;
            Ok(true)
        }
        (LogTarget::Stderr, None) => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| LoggingError::Init(e.to_string()))?;
            Ok(true)
        }
    }
}

/// Test logging, controlled by `TEST_LOG` and quiet by default. Safe to call
/// from every test.
#[cfg(test)]
pub(crate) fn init_for_tests() {
    let filter = std::env::var("TEST_LOG")
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .without_time()
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let config = LogConfig::default();
        assert_eq!(resolve_filter(Some("trace"), &config), "trace");
    }

    #[test]
    fn test_config_level_used_without_override_or_env() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LogConfig {
            level: "info".to_string(),
            file: None,
        };
        assert_eq!(resolve_filter(None, &config), "info");
    }

    #[test]
    fn test_tui_without_file_installs_nothing() {
        let config = LogConfig::default();
        let installed = init(Some("info"), &config, LogTarget::FileOnly).unwrap();
        assert!(!installed);
    }

    #[test]
    fn test_invalid_filter_is_reported() {
        let config = LogConfig::default();
        let err = init(Some("connect_four=loud"), &config, LogTarget::Stderr).unwrap_err();
        assert!(matches!(err, LoggingError::Filter { .. }));
    }
}
