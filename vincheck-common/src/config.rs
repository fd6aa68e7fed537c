//! Configuration loading and config file resolution
//!
//! Services read a single TOML file resolved in priority order:
//! 1. `VINCHECK_CONFIG` environment variable (highest priority)
//! 2. Platform config directory (`~/.config/vincheck/<service>.toml` on Linux)
//! 3. Compiled defaults (no file present)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level TOML configuration for a vincheck service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Socket address the HTTP server binds to
    pub listen_addr: String,
    pub vpic: VpicConfig,
    pub analysis: AnalysisConfig,
    pub decoder: DecoderConfig,
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:5731".to_string(),
            vpic: VpicConfig::default(),
            analysis: AnalysisConfig::default(),
            decoder: DecoderConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// NHTSA vPIC decode service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VpicConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for VpicConfig {
    fn default() -> Self {
        Self {
            base_url: "https://vpic.nhtsa.dot.gov/api/vehicles".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Text-generation collaborator settings
///
/// The API key is resolved separately (ENV over TOML) by the consuming
/// service; the value here is the lowest-priority tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

/// Reconciliation tuning
///
/// Both values are empirically chosen heuristics, kept configurable rather
/// than hard-coded. Defaults match the observed coverage gap of the vPIC
/// database for European-market vehicles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Remote model year may differ from the structural year code by at most
    /// this many years before the remote record is considered suspect
    pub year_mismatch_threshold: i32,
    /// VIN first characters treated as regional variants with unreliable
    /// remote coverage
    pub regional_prefixes: String,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            year_mismatch_threshold: 2,
            regional_prefixes: "WVZSTY".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing level filter: "error", "warn", "info", "debug", "trace"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Resolve the config file path for a service, if one exists
///
/// Priority: `VINCHECK_CONFIG` env var, then the platform config directory.
/// Returns None when neither yields an existing file.
pub fn resolve_config_path(service: &str) -> Option<PathBuf> {
    // Priority 1: explicit override
    if let Ok(path) = std::env::var("VINCHECK_CONFIG") {
        return Some(PathBuf::from(path));
    }

    // Priority 2: platform config directory
    let candidate = dirs::config_dir().map(|d| d.join("vincheck").join(format!("{}.toml", service)));

    match candidate {
        Some(path) if path.exists() => Some(path),
        _ => None,
    }
}

/// Load service configuration
///
/// A missing file is not an error (compiled defaults apply); an unreadable
/// or unparsable file is.
pub fn load_config(service: &str) -> Result<TomlConfig> {
    let Some(path) = resolve_config_path(service) else {
        tracing::info!(service = service, "No config file found, using defaults");
        return Ok(TomlConfig::default());
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    tracing::info!(service = service, path = %path.display(), "Configuration loaded");

    Ok(config)
}
