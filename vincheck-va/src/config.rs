//! Configuration resolution for vincheck-va
//!
//! Provides analysis API key resolution with ENV → TOML priority.

use tracing::{info, warn};
use vincheck_common::{Error, Result, TomlConfig};

/// Resolve the analysis API key from 2-tier configuration
///
/// **Priority:** ENV → TOML
pub fn resolve_analysis_api_key(config: &TomlConfig) -> Result<String> {
    let mut sources = Vec::new();

    // Tier 1: Environment variable
    let env_key = std::env::var("VINCHECK_ANALYSIS_API_KEY").ok();
    if env_key.as_deref().is_some_and(is_valid_key) {
        sources.push("environment");
    }

    // Tier 2: TOML config
    let toml_key = config.analysis.api_key.as_deref();
    if toml_key.is_some_and(is_valid_key) {
        sources.push("TOML");
    }

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "Analysis API key found in multiple sources: {}. Using environment (highest priority).",
            sources.join(", ")
        );
    }

    // Resolution priority
    if let Some(key) = env_key {
        if is_valid_key(&key) {
            info!("Analysis API key loaded from environment variable");
            return Ok(key);
        }
    }

    if let Some(key) = toml_key {
        if is_valid_key(key) {
            info!("Analysis API key loaded from TOML config");
            return Ok(key.to_string());
        }
    }

    Err(Error::Config(
        "Analysis API key not configured. Please configure using one of:\n\
         1. Environment: VINCHECK_ANALYSIS_API_KEY=your-key-here\n\
         2. TOML config: ~/.config/vincheck/vincheck-va.toml ([analysis] api_key = \"your-key\")"
            .to_string(),
    ))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use vincheck_common::config::AnalysisConfig;

    fn config_with_toml_key(key: Option<&str>) -> TomlConfig {
        TomlConfig {
            analysis: AnalysisConfig {
                api_key: key.map(str::to_string),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_key_validation() {
        assert!(is_valid_key("sk-something"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[test]
    #[serial]
    fn test_env_key_wins_over_toml() {
        std::env::set_var("VINCHECK_ANALYSIS_API_KEY", "env-key");
        let resolved = resolve_analysis_api_key(&config_with_toml_key(Some("toml-key")));
        std::env::remove_var("VINCHECK_ANALYSIS_API_KEY");

        assert_eq!(resolved.unwrap(), "env-key");
    }

    #[test]
    #[serial]
    fn test_toml_key_used_without_env() {
        std::env::remove_var("VINCHECK_ANALYSIS_API_KEY");
        let resolved = resolve_analysis_api_key(&config_with_toml_key(Some("toml-key")));
        assert_eq!(resolved.unwrap(), "toml-key");
    }

    #[test]
    #[serial]
    fn test_missing_key_is_config_error() {
        std::env::remove_var("VINCHECK_ANALYSIS_API_KEY");
        let resolved = resolve_analysis_api_key(&config_with_toml_key(None));
        assert!(matches!(resolved, Err(Error::Config(_))));
    }

    #[test]
    #[serial]
    fn test_blank_keys_are_ignored() {
        std::env::set_var("VINCHECK_ANALYSIS_API_KEY", "  ");
        let resolved = resolve_analysis_api_key(&config_with_toml_key(Some("toml-key")));
        std::env::remove_var("VINCHECK_ANALYSIS_API_KEY");

        assert_eq!(resolved.unwrap(), "toml-key");
    }
}
