//! CLI Test Command
//!
//! Runs a scripted scenario suite and reports pass/fail per scenario.

use anyhow::Result;

use crewcheck_adapter::IndividualAgentAdapter;
use crewcheck_core::AgentAdapter;
use crewcheck_runner::{run_suite, ScenarioRecord, Suite};

use crate::terminal_output::{note_error, note_info, note_success, note_warn, paint, GREEN, RED};
use crate::Runtime;

/// Run `suite` against the crew, or against one crew role when `agent` is set.
pub async fn run(runtime: &Runtime, suite: Suite, agent: Option<&str>) -> Result<()> {
    let individual;
    let adapter: &dyn AgentAdapter = match agent {
        Some(role) => {
            individual = IndividualAgentAdapter::new(role);
            &individual
        }
        None => &runtime.adapter,
    };
    note_info(&format!(
        "Running '{suite}' scenario suite against {}",
        agent.unwrap_or("the crew")
    ));

    let (results, path) = run_suite(
        adapter,
        suite,
        &runtime.store,
        runtime.config.max_turns,
        runtime.config.turn_timeout(),
        print_result,
    )
    .await?;

    let passed = results.values().filter(|r| r.success).count();
    let summary = format!("{passed}/{} scenarios passed", results.len());
    if passed == results.len() {
        note_success(&summary);
    } else {
        note_warn(&summary);
    }
    note_info(&format!("Scenario results saved to {}", path.display()));
    Ok(())
}

fn print_result(name: &str, record: &ScenarioRecord) {
    if let Some(error) = &record.error {
        note_error(&format!("{name}: {error}"));
        return;
    }
    let status = if record.success {
        paint(GREEN, "PASS")
    } else {
        paint(RED, "FAIL")
    };
    println!("  {status} {name}");
    if let Some(feedback) = &record.feedback {
        println!("       {feedback}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewcheck_config::CrewcheckConfig;

    #[tokio::test]
    async fn runs_suite_against_single_role() {
        let tmp = tempfile::tempdir().unwrap();
        let runtime = Runtime::new(CrewcheckConfig {
            results_dir: tmp.path().to_path_buf(),
            ..CrewcheckConfig::default()
        });

        run(&runtime, Suite::Basic, Some("Billing Support Specialist")).await.unwrap();

        let saved: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].starts_with("scenarios_"));
    }
}
