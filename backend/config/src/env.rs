//! Environment handling for config values.
//!
//! Two passes: `${VAR}` references inside the YAML file are substituted
//! first, then well-known variables override individual fields. Only
//! uppercase `[A-Z_][A-Z0-9_]*` names are substituted and `$${VAR}` escapes to
//! a literal `${VAR}`. Both passes take the environment as a map so tests can
//! inject one.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::schema::CrewcheckConfig;

/// `${VAR}` with an optional leading `$` marking an escape.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is valid"));

#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Snapshot of the process environment.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Substitute `${VAR}` references in every string leaf of `value`.
///
/// Unset or empty variables are an error naming the config path.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[1];
        if caps[0].starts_with("$$") {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// All variable names referenced in a value tree, sorted and deduplicated.
pub fn collect_referenced_vars(value: &Value) -> Vec<String> {
    let mut vars = Vec::new();
    collect_vars_recursive(value, &mut vars);
    vars.sort();
    vars.dedup();
    vars
}

fn collect_vars_recursive(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            for caps in ENV_VAR_PATTERN.captures_iter(s) {
                if !caps[0].starts_with("$$") {
                    out.push(caps[1].to_string());
                }
            }
        }
        Value::Array(arr) => arr.iter().for_each(|v| collect_vars_recursive(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_vars_recursive(v, out)),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Field overrides
// ---------------------------------------------------------------------------

/// Non-empty value of `key`, if any.
fn var<'a>(env: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_var<T>(env: &HashMap<String, String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(env, key)
        .map(|v| v.parse::<T>().with_context(|| format!("Invalid value for {key}: {v:?}")))
        .transpose()
}

fn parse_bool(env: &HashMap<String, String>, key: &str) -> Result<Option<bool>> {
    let Some(v) = var(env, key) else {
        return Ok(None);
    };
    match v.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => bail!("Invalid value for {key}: {v:?} (expected true or false)"),
    }
}

/// Apply well-known environment variables on top of `config`.
pub fn apply_env_overrides(
    mut config: CrewcheckConfig,
    env: &HashMap<String, String>,
) -> Result<CrewcheckConfig> {
    if let Some(v) = var(env, "CREWCHECK_RESULTS_DIR") {
        config.results_dir = PathBuf::from(v);
    }
    if let Some(v) = var(env, "CREWCHECK_LOG_DIR") {
        config.log_dir = PathBuf::from(v);
    }
    if let Some(v) = var(env, "CREWCHECK_LOG_LEVEL") {
        config.log_level = v.to_string();
    }
    if let Some(v) = var(env, "DEFAULT_MODEL") {
        config.default_model = v.to_string();
    }
    if let Some(v) = var(env, "JUDGE_MODEL") {
        config.judge_model = v.to_string();
    }
    if let Some(v) = var(env, "SIMULATOR_MODEL") {
        config.simulator_model = v.to_string();
    }
    if let Some(v) = parse_var(env, "MAX_TURNS")? {
        config.max_turns = v;
    }
    if let Some(v) = parse_bool(env, "CACHE_ENABLED")? {
        config.cache_enabled = v;
    }
    if let Some(v) = parse_bool(env, "DEBUG_MODE")? {
        config.debug_mode = v;
    }
    if let Some(v) = parse_var(env, "CREWCHECK_TURN_TIMEOUT_SECS")? {
        config.turn_timeout_secs = Some(v);
    }
    if let Some(v) = parse_var(env, "CREWCHECK_MAX_THREADS")? {
        config.max_threads = Some(v);
    }
    if let Some(v) = parse_var(env, "CREWCHECK_THREAD_IDLE_TTL_SECS")? {
        config.thread_idle_ttl_secs = Some(v);
    }
    if let Some(v) = var(env, "OPENAI_API_KEY") {
        config.openai_api_key = Some(v.to_string());
    }
    debug!("Applied environment overrides");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_nested_vars() {
        let v = json!({"a": {"b": "key=${OPENAI_API_KEY}"}, "list": ["${MY_VAR}"]});
        let env = env(&[("OPENAI_API_KEY", "sk-abc123"), ("MY_VAR", "hello")]);
        let result = resolve_env_vars_with(&v, &env).unwrap();
        assert_eq!(result["a"]["b"], "key=sk-abc123");
        assert_eq!(result["list"][0], "hello");
    }

    #[test]
    fn missing_var_names_path() {
        let v = json!({"judge_model": "${MISSING_VAR}"});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err().to_string();
        assert!(err.contains("MISSING_VAR"));
        assert!(err.contains("judge_model"));
    }

    #[test]
    fn escaped_reference_is_literal() {
        let v = json!({"note": "use $${HOME_DIR} here"});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result["note"], "use ${HOME_DIR} here");
        assert!(collect_referenced_vars(&v).is_empty());
    }

    #[test]
    fn lowercase_names_are_not_substituted() {
        let v = json!({"k": "${lower}"});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result["k"], "${lower}");
    }

    #[test]
    fn collects_referenced_vars() {
        let v = json!({"a": "${FOO}", "b": {"c": "${BAR} ${FOO}"}});
        assert_eq!(collect_referenced_vars(&v), vec!["BAR".to_string(), "FOO".to_string()]);
    }

    #[test]
    fn overrides_apply_over_defaults() {
        let env = env(&[
            ("MAX_TURNS", "3"),
            ("DEBUG_MODE", "TRUE"),
            ("CACHE_ENABLED", "0"),
            ("JUDGE_MODEL", "local/judge"),
            ("CREWCHECK_TURN_TIMEOUT_SECS", "30"),
            ("OPENAI_API_KEY", ""),
        ]);
        let cfg = apply_env_overrides(CrewcheckConfig::default(), &env).unwrap();
        assert_eq!(cfg.max_turns, 3);
        assert!(cfg.debug_mode);
        assert!(!cfg.cache_enabled);
        assert_eq!(cfg.judge_model, "local/judge");
        assert_eq!(cfg.turn_timeout_secs, Some(30));
        assert_eq!(cfg.openai_api_key, None);
    }

    #[test]
    fn bad_override_is_an_error() {
        let err = apply_env_overrides(CrewcheckConfig::default(), &env(&[("MAX_TURNS", "many")]))
            .unwrap_err()
            .to_string();
        assert!(err.contains("MAX_TURNS"));
        assert!(apply_env_overrides(CrewcheckConfig::default(), &env(&[("DEBUG_MODE", "maybe")])).is_err());
    }
}
