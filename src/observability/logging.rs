//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;

/// Environment variable holding a filter directive. Wins over every other source.
pub const LOG_ENV_VAR: &str = "DXNORM_LOG";

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV_VAR: &str = "DXNORM_LOG_FORMAT";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parses a format name. Unknown names fall back to pretty.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
    /// Log file; stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds logging configuration from config settings with env overrides.
    ///
    /// Filter precedence: `DXNORM_LOG`, then `[logging] level`, then `debug`
    /// when `verbose` is set, then `info`.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        Self::resolve(
            settings,
            verbose,
            std::env::var(LOG_ENV_VAR).ok(),
            std::env::var(LOG_FORMAT_ENV_VAR).ok(),
        )
    }

    fn resolve(
        settings: Option<&LoggingSettings>,
        verbose: bool,
        env_filter: Option<String>,
        env_format: Option<String>,
    ) -> Self {
        let filter = env_filter
            .filter(|f| !f.trim().is_empty())
            .or_else(|| settings.and_then(|s| s.level.clone()))
            .unwrap_or_else(|| if verbose { "debug" } else { "info" }.to_string());
        let format = env_format
            .or_else(|| settings.and_then(|s| s.format.clone()))
            .map(|f| LogFormat::parse(&f))
            .unwrap_or_default();
        let file = settings.and_then(|s| s.file.clone());

        Self {
            filter,
            format,
            file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_verbose() {
        assert_eq!(LoggingConfig::resolve(None, false, None, None).filter, "info");
        assert_eq!(LoggingConfig::resolve(None, true, None, None).filter, "debug");
    }

    #[test]
    fn test_settings_then_env_precedence() {
        let settings = LoggingSettings {
            level: Some("warn".to_string()),
            format: Some("json".to_string()),
            file: Some(PathBuf::from("/tmp/dxnorm.log")),
        };

        let config = LoggingConfig::resolve(Some(&settings), true, None, None);
        assert_eq!(config.filter, "warn");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file, Some(PathBuf::from("/tmp/dxnorm.log")));

        let config = LoggingConfig::resolve(
            Some(&settings),
            false,
            Some("dxnorm=trace".to_string()),
            Some("pretty".to_string()),
        );
        assert_eq!(config.filter, "dxnorm=trace");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_blank_env_filter_ignored() {
        let config = LoggingConfig::resolve(None, false, Some("  ".to_string()), None);
        assert_eq!(config.filter, "info");
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("xml"), LogFormat::Pretty);
    }
}
