//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.modhub/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::builder::{RowDefaults, ToggleAdjustMode};
use crate::core::capture::{CaptureLabels, DEFAULT_LISTENING_LABEL, DEFAULT_UNBOUND_LABEL};
use crate::core::entries::PercentPolicy;
use crate::core::hub::HubSettings;
use crate::core::registry::DEFAULT_OWNER_LABEL_LEN;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ModhubConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub percent: PercentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub capacity: Option<usize>,
    pub listening_label: Option<String>,
    pub unbound_label: Option<String>,
    pub owner_label_len: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InputConfig {
    pub toggle_mode: Option<ToggleAdjustMode>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PercentConfig {
    pub min_floor: Option<f64>,
    pub min_below: Option<f64>,
    pub max_above: Option<f64>,
    pub max_at_most: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_CAPACITY: usize = 8;
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Display slots the demo host draws. The hub itself takes capacity
    /// per render call.
    pub capacity: usize,
    pub log_level: LevelFilter,
    pub hub: HubSettings,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.modhub/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".modhub").join("config.toml"))
}

/// Load config from `~/.modhub/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ModhubConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ModhubConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ModhubConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ModhubConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ModhubConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ModhubConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_TOML: &str = r#"# Modhub Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [display]
# capacity = 8                       # Display slots, including NEXT and BACK (or MODHUB_CAPACITY)
# listening_label = "Listening..."
# unbound_label = "Not set"
# owner_label_len = 8                # Owner label length in shared page titles

# [input]
# toggle_mode = "toggle"             # "toggle" or "directional"

# [percent]                          # Float ranges shown as percentages
# min_floor = 0.0
# min_below = 0.5
# max_above = 0.5
# max_at_most = 5.0

# [logging]
# level = "debug"                    # "off", "error", "warn", "info", "debug", "trace" (or MODHUB_LOG_LEVEL)
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_TOML) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_capacity` and `cli_log_level` are from CLI flags (None = not specified).
pub fn resolve(
    config: &ModhubConfig,
    cli_capacity: Option<usize>,
    cli_log_level: Option<LevelFilter>,
) -> ResolvedConfig {
    resolve_with_env(config, cli_capacity, cli_log_level, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &ModhubConfig,
    cli_capacity: Option<usize>,
    cli_log_level: Option<LevelFilter>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Capacity: CLI → env → config → default
    let capacity = cli_capacity
        .or_else(|| env("MODHUB_CAPACITY").and_then(|v| parse_or_warn("MODHUB_CAPACITY", &v)))
        .or(config.display.capacity)
        .unwrap_or(DEFAULT_CAPACITY);

    // Log level: CLI → env → config → default
    let log_level = cli_log_level
        .or_else(|| env("MODHUB_LOG_LEVEL").and_then(|v| parse_or_warn("MODHUB_LOG_LEVEL", &v)))
        .or_else(|| {
            config
                .logging
                .level
                .as_deref()
                .and_then(|v| parse_or_warn("logging.level", v))
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let defaults = PercentPolicy::default();
    let percent_policy = PercentPolicy {
        min_floor: config.percent.min_floor.unwrap_or(defaults.min_floor),
        min_below: config.percent.min_below.unwrap_or(defaults.min_below),
        max_above: config.percent.max_above.unwrap_or(defaults.max_above),
        max_at_most: config.percent.max_at_most.unwrap_or(defaults.max_at_most),
    };

    let hub = HubSettings {
        rows: RowDefaults {
            toggle_mode: config.input.toggle_mode.unwrap_or_default(),
            capture_labels: CaptureLabels {
                listening: config
                    .display
                    .listening_label
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LISTENING_LABEL.to_string()),
                unbound: config
                    .display
                    .unbound_label
                    .clone()
                    .unwrap_or_else(|| DEFAULT_UNBOUND_LABEL.to_string()),
            },
        },
        owner_label_len: config.display.owner_label_len.unwrap_or(DEFAULT_OWNER_LABEL_LEN),
        percent_policy,
    };

    ResolvedConfig {
        capacity,
        log_level,
        hub,
    }
}

fn parse_or_warn<T: std::str::FromStr>(source: &str, raw: &str) -> Option<T> {
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring invalid value '{}' for {}", raw, source);
            None
        }
    }
}
