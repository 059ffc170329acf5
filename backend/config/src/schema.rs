//! Typed configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::*;

/// Runtime settings. Built once at startup and passed to whatever needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewcheckConfig {
    /// Where run artifacts (`basic_demo_*.json`, …) are written.
    pub results_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub default_model: String,
    pub judge_model: String,
    pub simulator_model: String,
    /// Upper bound on adapter replies per scripted scenario.
    pub max_turns: u32,
    pub cache_enabled: bool,
    /// Forces `debug` logging when set.
    pub debug_mode: bool,
    /// Per-turn deadline for the orchestrator. Unset means wait forever.
    pub turn_timeout_secs: Option<u64>,
    /// Cap on live conversation threads. Unset means unbounded.
    pub max_threads: Option<u64>,
    /// Drop threads idle for this long. Unset means never.
    pub thread_idle_ttl_secs: Option<u64>,
    pub openai_api_key: Option<String>,
}

impl Default for CrewcheckConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            judge_model: DEFAULT_JUDGE_MODEL.to_string(),
            simulator_model: DEFAULT_SIMULATOR_MODEL.to_string(),
            max_turns: DEFAULT_MAX_TURNS,
            cache_enabled: true,
            debug_mode: false,
            turn_timeout_secs: None,
            max_threads: None,
            thread_idle_ttl_secs: None,
            openai_api_key: None,
        }
    }
}

impl CrewcheckConfig {
    pub fn turn_timeout(&self) -> Option<Duration> {
        self.turn_timeout_secs.map(Duration::from_secs)
    }

    pub fn thread_idle_ttl(&self) -> Option<Duration> {
        self.thread_idle_ttl_secs.map(Duration::from_secs)
    }

    /// Level handed to the logger; `debug_mode` wins over `log_level`.
    pub fn effective_log_level(&self) -> &str {
        if self.debug_mode {
            "debug"
        } else {
            &self.log_level
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.openai_api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg: CrewcheckConfig = serde_yaml::from_str("max_turns: 4\ndebug_mode: true\n").unwrap();
        assert_eq!(cfg.max_turns, 4);
        assert_eq!(cfg.judge_model, DEFAULT_JUDGE_MODEL);
        assert_eq!(cfg.effective_log_level(), "debug");
        assert!(cfg.turn_timeout().is_none());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = CrewcheckConfig {
            openai_api_key: Some("  ".into()),
            ..Default::default()
        };
        assert!(!cfg.has_api_key());
    }
}
