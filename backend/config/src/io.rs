//! Config file loading.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, info};

use crate::env::{collect_referenced_vars, resolve_env_vars_with};
use crate::schema::CrewcheckConfig;

/// Parse a YAML config file, substituting `${VAR}` references from `env`.
///
/// Keys missing from the file keep their defaults. An empty file yields the
/// defaults.
pub async fn load_config_file(path: &Path, env: &HashMap<String, String>) -> Result<CrewcheckConfig> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = parse_config(&raw, env)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;
    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Parse YAML text into a config, substituting `${VAR}` references from `env`.
pub fn parse_config(raw: &str, env: &HashMap<String, String>) -> Result<CrewcheckConfig> {
    if raw.trim().is_empty() {
        return Ok(CrewcheckConfig::default());
    }
    let yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("Invalid YAML")?;
    let value = serde_json::to_value(yaml).context("Config is not representable as JSON")?;
    let referenced = collect_referenced_vars(&value);
    if !referenced.is_empty() {
        debug!(vars = ?referenced, "Config references environment variables");
    }
    let value = resolve_env_vars_with(&value, env)?;
    serde_json::from_value(value).context("Config does not match the expected schema")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_substitution() {
        let env: HashMap<String, String> = [("KEY".to_string(), "sk-test".to_string())].into();
        let cfg = parse_config("openai_api_key: ${KEY}\nresults_dir: out\n", &env).unwrap();
        assert_eq!(cfg.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.results_dir, Path::new("out"));
    }

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(parse_config("  \n", &HashMap::new()).unwrap(), CrewcheckConfig::default());
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(parse_config("max_turns: lots\n", &HashMap::new()).is_err());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_config_file(&tmp.path().join("nope.yaml"), &HashMap::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
