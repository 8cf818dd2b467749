//! Configuration module.
//!
//! Precedence: Defaults → Config File → Env Vars → CLI Args.

pub mod keybindings;
pub mod loader;

pub use keybindings::{KeyAction, KeyBindings};
pub use loader::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config,
    CliOverrides, ConfigError, ConfigFile, ResolvedConfig,
};

/// Resolve the full configuration chain.
///
/// # Errors
///
/// Returns `ConfigError` if a config file exists but is unreadable, invalid
/// TOML, or holds an invalid value.
pub fn resolve(
    config_path: Option<std::path::PathBuf>,
    cli: CliOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let merged = merge_config(file)?;
    Ok(apply_cli_overrides(apply_env_overrides(merged), cli))
}
