//! Configuration file loading with precedence handling.

use crate::state::PreviewPosition;
use crate::state::DEFAULT_MINIMAP_WIDTH;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const ENV_CONFIG: &str = "THREADLENS_CONFIG";
/// Environment variable overriding the export directory.
pub const ENV_EXPORT_DIR: &str = "THREADLENS_EXPORT_DIR";

const APP_DIR: &str = "threadlens";
const DEFAULT_EXPORT_DIR: &str = "threadlens-export";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A field parsed but holds an unusable value.
    #[error("Invalid value for {field}: {value}")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/threadlens/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Where jumped-to entries land: "top", "middle" or "bottom".
    #[serde(default)]
    pub preview_position: Option<String>,

    /// Minimap pane width in columns.
    #[serde(default)]
    pub minimap_width: Option<usize>,

    /// Directory stage exports are written to.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Open the raw transcript view instead of the clean view.
    #[serde(default)]
    pub start_in_raw: Option<bool>,

    /// Use colors in the TUI.
    #[serde(default)]
    pub color: Option<bool>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Preview alignment for jumps.
    pub preview_position: PreviewPosition,
    /// Minimap pane width.
    pub minimap_width: usize,
    /// Export directory.
    pub export_dir: PathBuf,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Start in the raw view.
    pub start_in_raw: bool,
    /// Colored output.
    pub color: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            preview_position: PreviewPosition::default(),
            minimap_width: DEFAULT_MINIMAP_WIDTH,
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            log_file_path: default_log_path(),
            start_in_raw: false,
            color: true,
        }
    }
}

/// CLI values that override everything else. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--preview`
    pub preview_position: Option<PreviewPosition>,
    /// `--minimap-width`
    pub minimap_width: Option<usize>,
    /// `--export-dir`
    pub export_dir: Option<PathBuf>,
    /// `--raw`
    pub start_in_raw: Option<bool>,
    /// `--no-color`
    pub color: Option<bool>,
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/threadlens/threadlens.log` on Unix-like systems,
/// or the platform equivalent. Falls back to the current directory when no
/// state directory is known.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join(APP_DIR).join("threadlens.log"),
        None => PathBuf::from("threadlens.log"),
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/threadlens/config.toml` on Unix, appropriate path on
/// other platforms. `None` if the config directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `THREADLENS_CONFIG` environment variable
/// 3. Default path `~/.config/threadlens/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults to create resolved config.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for an unknown `preview_position`.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let preview_position = match config.preview_position {
        Some(raw) => PreviewPosition::parse(&raw).ok_or(ConfigError::InvalidValue {
            field: "preview_position",
            value: raw,
        })?,
        None => defaults.preview_position,
    };

    Ok(ResolvedConfig {
        preview_position,
        minimap_width: config.minimap_width.unwrap_or(defaults.minimap_width),
        export_dir: config.export_dir.unwrap_or(defaults.export_dir),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        start_in_raw: config.start_in_raw.unwrap_or(defaults.start_in_raw),
        color: config.color.unwrap_or(defaults.color),
    })
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `THREADLENS_EXPORT_DIR`: Override export directory
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(dir) = std::env::var(ENV_EXPORT_DIR) {
        if !dir.is_empty() {
            config.export_dir = PathBuf::from(dir);
        }
    }
    config
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(position) = cli.preview_position {
        config.preview_position = position;
    }
    if let Some(width) = cli.minimap_width {
        config.minimap_width = width;
    }
    if let Some(dir) = cli.export_dir {
        config.export_dir = dir;
    }
    if let Some(raw) = cli.start_in_raw {
        config.start_in_raw = raw;
    }
    if let Some(color) = cli.color {
        config.color = color;
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
