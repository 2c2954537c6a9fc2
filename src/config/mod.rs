//! Configuration management.
//!
//! Settings come from `<config_dir>/dxnorm/config.toml`, or a file named on
//! the command line. Every field is optional; anything absent keeps its
//! default, and command-line flags override the file.
//!
//! ```toml
//! [paths]
//! categories_dir = "course_category_data"
//! programs_dir = "program_detail_data"
//! courses_dir = "course_detail_data"
//! output_dir = "."
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! file = "/var/log/dxnorm.log"
//! ```

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration for dxnorm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DxnormConfig {
    /// Directory of raw category records.
    pub categories_dir: PathBuf,
    /// Directory of raw program records.
    pub programs_dir: PathBuf,
    /// Directory of raw course records.
    pub courses_dir: PathBuf,
    /// Where aggregated output files go.
    pub output_dir: PathBuf,
    /// Logging settings, resolved later by [`crate::observability`].
    pub logging: LoggingSettings,
}

/// Logging section as written in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `"info"` or `"dxnorm=debug"`.
    pub level: Option<String>,
    /// `"pretty"` or `"json"`.
    pub format: Option<String>,
    /// Log file path. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Input and output locations.
    pub paths: Option<ConfigFilePaths>,
    /// Logging settings.
    pub logging: Option<LoggingSettings>,
}

/// Paths section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFilePaths {
    /// Category records.
    pub categories_dir: Option<String>,
    /// Program records.
    pub programs_dir: Option<String>,
    /// Course records.
    pub courses_dir: Option<String>,
    /// Output directory.
    pub output_dir: Option<String>,
}

impl Default for DxnormConfig {
    fn default() -> Self {
        Self {
            categories_dir: PathBuf::from("course_category_data"),
            programs_dir: PathBuf::from("program_detail_data"),
            courses_dir: PathBuf::from("course_detail_data"),
            output_dir: PathBuf::from("."),
            logging: LoggingSettings::default(),
        }
    }
}

impl DxnormConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the file does not exist, or an error if
    /// it cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::operation("read_config_file", e))?;
        Self::parse(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for [`ConfigFile`].
    pub fn parse(contents: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| Error::operation("parse_config_file", e))?;
        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks `<config_dir>/dxnorm/config.toml` (platform-specific config dir).
    /// Returns default configuration if the platform has no config dir or no
    /// file exists there.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed. The
    /// caller decides whether to fall back to defaults.
    pub fn load_default() -> Result<Self> {
        Self::default_path().map_or_else(|| Ok(Self::default()), |path| Self::load_optional(&path))
    }

    /// Loads `path` if it exists, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_optional(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// The default config file location, if the platform has one.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("dxnorm").join("config.toml"))
    }

    /// Converts a `ConfigFile` to `DxnormConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(paths) = file.paths {
            if let Some(dir) = paths.categories_dir {
                config.categories_dir = PathBuf::from(dir);
            }
            if let Some(dir) = paths.programs_dir {
                config.programs_dir = PathBuf::from(dir);
            }
            if let Some(dir) = paths.courses_dir {
                config.courses_dir = PathBuf::from(dir);
            }
            if let Some(dir) = paths.output_dir {
                config.output_dir = PathBuf::from(dir);
            }
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }

    /// Sets the category records directory.
    #[must_use]
    pub fn with_categories_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.categories_dir = path.into();
        self
    }

    /// Sets the program records directory.
    #[must_use]
    pub fn with_programs_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.programs_dir = path.into();
        self
    }

    /// Sets the course records directory.
    #[must_use]
    pub fn with_courses_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.courses_dir = path.into();
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }
}
