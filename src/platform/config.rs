// repairlog - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::ExportFormat;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for repairlog configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/repairlog/ or %APPDATA%\repairlog\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[output]` section.
    pub output: OutputSection,
    /// `[search]` section.
    pub search: SearchSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Default output document path.
    pub path: Option<String>,
    /// "json" or "csv".
    pub format: Option<String>,
    /// Text placed between distinct solutions.
    pub solution_separator: Option<String>,
}

/// `[search]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Results returned by a keyword search.
    pub max_results: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// `[output] path`, when set. `None` means the built-in default name.
    pub output_path: Option<PathBuf>,
    pub output_format: ExportFormat,
    pub solution_separator: String,
    pub max_search_results: usize,
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_path: None,
            output_format: ExportFormat::default(),
            solution_separator: constants::DEFAULT_SOLUTION_SEPARATOR.to_string(),
            max_search_results: constants::DEFAULT_MAX_SEARCH_RESULTS,
            log_level: None,
        }
    }
}

/// Load and validate a config file.
///
/// When `explicit` is false (the platform default location), a missing or
/// unparseable file falls back to defaults with a warning so the tool still
/// runs. When the user named the file with `--config`, those are errors.
pub fn load_config(path: &Path, explicit: bool) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let mut warnings: Vec<String> = Vec::new();

    if !path.exists() {
        if explicit {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        tracing::debug!(path = %path.display(), "No config.toml found; using defaults");
        return Ok((AppConfig::default(), warnings));
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if explicit => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
        Err(e) => {
            warnings.push(format!(
                "Could not read config file '{}': {e}. Using defaults.",
                path.display()
            ));
            return Ok((AppConfig::default(), warnings));
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) if explicit => {
            return Err(ConfigError::TomlParse {
                path: path.to_path_buf(),
                source: e,
            })
        }
        Err(e) => {
            warnings.push(format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                path.display()
            ));
            return Ok((AppConfig::default(), warnings));
        }
    };

    tracing::info!(path = %path.display(), "Loaded config.toml");

    let (config, validation_warnings) = validate(raw);
    warnings.extend(validation_warnings);
    Ok((config, warnings))
}

/// Check a solution separator against the allowed length range.
///
/// Shared by config validation and the `--separator` flag.
pub fn check_solution_separator(sep: &str) -> Result<(), String> {
    let len = sep.chars().count();
    if (1..=constants::MAX_SOLUTION_SEPARATOR_LEN).contains(&len) {
        Ok(())
    } else {
        Err(format!(
            "solution separator must be 1-{} characters (got {len})",
            constants::MAX_SOLUTION_SEPARATOR_LEN
        ))
    }
}

/// Check a search result limit against the allowed range.
///
/// Shared by config validation and the `--limit` flag.
pub fn check_max_results(n: usize) -> Result<(), String> {
    if (1..=constants::ABSOLUTE_MAX_SEARCH_RESULTS).contains(&n) {
        Ok(())
    } else {
        Err(format!(
            "{n} is out of range (1-{})",
            constants::ABSOLUTE_MAX_SEARCH_RESULTS
        ))
    }
}

/// Validate each field against named constants, accumulating all problems.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings = Vec::new();

    // -- Output: path --
    if let Some(path) = raw.output.path {
        if path.trim().is_empty() {
            warnings.push(format!(
                "[output] path is empty. Using default ({}).",
                constants::DEFAULT_OUTPUT_FILE
            ));
        } else {
            config.output_path = Some(PathBuf::from(path));
        }
    }

    // -- Output: format --
    if let Some(ref format) = raw.output.format {
        match format.parse::<ExportFormat>() {
            Ok(f) => config.output_format = f,
            Err(e) => warnings.push(format!("[output] format: {e}. Using default (json).")),
        }
    }

    // -- Output: solution_separator --
    if let Some(sep) = raw.output.solution_separator {
        match check_solution_separator(&sep) {
            Ok(()) => config.solution_separator = sep,
            Err(e) => warnings.push(format!(
                "[output] {e}. Using default (\"{}\").",
                constants::DEFAULT_SOLUTION_SEPARATOR,
            )),
        }
    }

    // -- Search: max_results --
    if let Some(n) = raw.search.max_results {
        match check_max_results(n) {
            Ok(()) => config.max_search_results = n,
            Err(e) => warnings.push(format!(
                "[search] max_results = {e}. Using default ({}).",
                constants::DEFAULT_MAX_SEARCH_RESULTS,
            )),
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    (config, warnings)
}
