//! Configuration file loading with precedence handling.

use super::keybindings::{parse_key, KeyBindings};
use crate::model::KeyAction;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

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

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// `[keybindings]` names an action that does not exist.
    #[error("Unknown action in [keybindings]: {0}")]
    UnknownAction(String),

    /// `[keybindings]` contains a key string that cannot be parsed.
    #[error("Invalid key \"{key}\" for {action}: {reason}")]
    InvalidKeyBinding {
        /// Action being bound.
        action: String,
        /// Offending key string.
        key: String,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/kubeoptic/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Theme name ("default" or "monochrome").
    #[serde(default)]
    pub theme: Option<String>,

    /// Start the log viewer in follow mode.
    #[serde(default)]
    pub follow: Option<bool>,

    /// Wrap long log lines.
    #[serde(default)]
    pub wrap: Option<bool>,

    /// Show leading timestamps on log lines.
    #[serde(default)]
    pub show_timestamps: Option<bool>,

    /// Per-read timeout for log streams, in seconds.
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,

    /// Lines of history requested when a stream opens.
    #[serde(default)]
    pub tail_lines: Option<usize>,

    /// Path or name of the `kubectl` binary.
    #[serde(default)]
    pub kubectl: Option<PathBuf>,

    /// Directory that saved log files are written to.
    #[serde(default)]
    pub save_dir: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Action name to key strings, e.g. `quit = ["q", "ctrl+c"]`.
    #[serde(default)]
    pub keybindings: Option<BTreeMap<String, Vec<String>>>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Theme name.
    pub theme: String,
    /// Follow mode on stream start.
    pub follow: bool,
    /// Line wrapping.
    pub wrap: bool,
    /// Timestamp visibility.
    pub show_timestamps: bool,
    /// Per-read timeout.
    pub read_timeout: Duration,
    /// `--tail` value passed to `kubectl logs`.
    pub tail_lines: usize,
    /// `kubectl` binary.
    pub kubectl: PathBuf,
    /// Where saved logs go.
    pub save_dir: PathBuf,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Key map with any `[keybindings]` overrides applied.
    pub keybindings: KeyBindings,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            follow: true,
            wrap: false,
            show_timestamps: false,
            read_timeout: Duration::from_secs(5),
            tail_lines: 500,
            kubectl: PathBuf::from("kubectl"),
            save_dir: default_save_dir(),
            log_file_path: default_log_path(),
            keybindings: KeyBindings::default(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/kubeoptic/kubeoptic.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("kubeoptic").join("kubeoptic.log")
    } else {
        PathBuf::from("kubeoptic.log")
    }
}

/// Resolve default directory for saved logs: the current directory.
pub fn default_save_dir() -> PathBuf {
    PathBuf::from(".")
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
/// Returns `~/.config/kubeoptic/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kubeoptic").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `KUBEOPTIC_CONFIG` environment variable
/// 3. Default path `~/.config/kubeoptic/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
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

    if let Ok(env_path) = std::env::var("KUBEOPTIC_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
///
/// # Errors
///
/// Returns error if `[keybindings]` names an unknown action or an unparsable key.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let mut keybindings = defaults.keybindings;
    if let Some(overrides) = &config.keybindings {
        apply_keybinding_overrides(&mut keybindings, overrides)?;
    }

    Ok(ResolvedConfig {
        theme: config.theme.unwrap_or(defaults.theme),
        follow: config.follow.unwrap_or(defaults.follow),
        wrap: config.wrap.unwrap_or(defaults.wrap),
        show_timestamps: config.show_timestamps.unwrap_or(defaults.show_timestamps),
        read_timeout: config
            .read_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.read_timeout),
        tail_lines: config.tail_lines.unwrap_or(defaults.tail_lines),
        kubectl: config.kubectl.unwrap_or(defaults.kubectl),
        save_dir: config.save_dir.unwrap_or(defaults.save_dir),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        keybindings,
    })
}

fn apply_keybinding_overrides(
    bindings: &mut KeyBindings,
    overrides: &BTreeMap<String, Vec<String>>,
) -> Result<(), ConfigError> {
    for (name, keys) in overrides {
        let action = KeyAction::from_config_name(name)
            .ok_or_else(|| ConfigError::UnknownAction(name.clone()))?;
        let parsed = keys
            .iter()
            .map(|raw| {
                parse_key(raw).map_err(|e| ConfigError::InvalidKeyBinding {
                    action: name.clone(),
                    key: raw.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        bindings.rebind(action, &parsed);
    }
    Ok(())
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `KUBEOPTIC_THEME`: Override theme
/// - `KUBEOPTIC_FOLLOW`: Override follow mode (`true`/`false`/`1`/`0`)
/// - `KUBEOPTIC_LOG_FILE`: Override tracing log path
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(theme) = std::env::var("KUBEOPTIC_THEME") {
        config.theme = theme;
    }

    if let Some(follow) = std::env::var("KUBEOPTIC_FOLLOW")
        .ok()
        .and_then(|v| parse_bool(&v))
    {
        config.follow = follow;
    }

    if let Ok(path) = std::env::var("KUBEOPTIC_LOG_FILE") {
        config.log_file_path = PathBuf::from(path);
    }

    config
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Overrides collected from command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--theme`
    pub theme: Option<String>,
    /// `--no-follow` sets `Some(false)`.
    pub follow: Option<bool>,
    /// `--kubectl`
    pub kubectl: Option<PathBuf>,
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }

    if let Some(follow) = cli.follow {
        config.follow = follow;
    }

    if let Some(kubectl) = cli.kubectl {
        config.kubectl = kubectl;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
