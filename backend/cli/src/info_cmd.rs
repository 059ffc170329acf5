//! CLI Info Command
//!
//! Prints the effective configuration. The API key itself is never shown.

use anyhow::Result;

use crewcheck_config::CrewcheckConfig;

use crate::terminal_output::{render_table, Column};

pub fn run(config: &CrewcheckConfig) -> Result<()> {
    println!("\ncrewcheck configuration\n");
    print!("{}", render_info(config));
    Ok(())
}

fn render_info(config: &CrewcheckConfig) -> String {
    let columns = vec![Column::left("Setting"), Column::left("Value").max_width(60)];
    render_table(&columns, &settings(config))
}

fn settings(config: &CrewcheckConfig) -> Vec<Vec<String>> {
    let optional = |v: Option<u64>, unset: &str| v.map_or_else(|| unset.to_string(), |v| v.to_string());
    let rows: Vec<(&str, String)> = vec![
        ("Default Model", config.default_model.clone()),
        ("Judge Model", config.judge_model.clone()),
        ("Simulator Model", config.simulator_model.clone()),
        ("Max Turns", config.max_turns.to_string()),
        ("Cache Enabled", config.cache_enabled.to_string()),
        ("Debug Mode", config.debug_mode.to_string()),
        ("Log Level", config.effective_log_level().to_string()),
        ("Results Dir", config.results_dir.display().to_string()),
        ("Log Dir", config.log_dir.display().to_string()),
        ("Turn Timeout (s)", optional(config.turn_timeout_secs, "none")),
        ("Max Threads", optional(config.max_threads, "unbounded")),
        ("Thread Idle TTL (s)", optional(config.thread_idle_ttl_secs, "never")),
        (
            "OpenAI API Key",
            if config.has_api_key() { "Set" } else { "Not set" }.to_string(),
        ),
    ];
    rows.into_iter().map(|(k, v)| vec![k.to_string(), v]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal_output::strip_ansi;

    #[test]
    fn masks_api_key() {
        let config = CrewcheckConfig {
            openai_api_key: Some("sk-secret-value-that-must-not-leak".into()),
            ..CrewcheckConfig::default()
        };
        let out = strip_ansi(&render_info(&config));
        assert!(out.contains("OpenAI API Key"));
        assert!(out.contains("Set"));
        assert!(!out.contains("sk-secret"));
    }

    #[test]
    fn shows_unset_limits() {
        let out = strip_ansi(&render_info(&CrewcheckConfig::default()));
        assert!(out.contains("Not set"));
        assert!(out.contains("unbounded"));
        assert!(out.contains("never"));
    }

    #[test]
    fn debug_mode_forces_debug_level() {
        let config = CrewcheckConfig {
            debug_mode: true,
            log_level: "warn".into(),
            ..CrewcheckConfig::default()
        };
        let rows = settings(&config);
        let level = rows.iter().find(|r| r[0] == "Log Level").unwrap();
        assert_eq!(level[1], "debug");
    }
}
