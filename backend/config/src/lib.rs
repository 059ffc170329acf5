//! `crewcheck-config`: runtime configuration.
//!
//! Layers, lowest first:
//! - built-in defaults
//! - an optional YAML file with `${ENV_VAR}` substitution
//! - environment variable overrides (`MAX_TURNS`, `JUDGE_MODEL`, …)
//!
//! The environment is passed in as a map so callers and tests control it.

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::DEFAULT_CONFIG_FILE;
pub use env::{
    apply_env_overrides, collect_referenced_vars, process_env, resolve_env_vars_with,
    MissingEnvVarError,
};
pub use io::{load_config_file, parse_config};
pub use schema::CrewcheckConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Result};
use tracing::{debug, error, warn};

/// Build the effective configuration.
///
/// With `path` the file must exist. Without it, `crewcheck.yaml` in the
/// working directory is used when present. Validation warnings are logged;
/// validation errors fail the load.
pub async fn load(path: Option<&Path>, env: &HashMap<String, String>) -> Result<CrewcheckConfig> {
    let config = match path {
        Some(path) => load_config_file(path, env).await?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            load_config_file(Path::new(DEFAULT_CONFIG_FILE), env).await?
        }
        None => {
            debug!("No config file; using defaults");
            CrewcheckConfig::default()
        }
    };
    let config = apply_env_overrides(config, env)?;

    let report = validate(&config);
    for warning in &report.warnings {
        warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for err in &report.errors {
        error!(path = %err.path, message = %err.message, "Config error");
    }
    if let Some(first) = report.errors.first() {
        bail!("Invalid configuration: {first}");
    }
    Ok(config)
}
