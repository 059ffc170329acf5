//! Scripted scenario suites.
//!
//! A scenario replays a fixed script against the adapter on a fresh thread,
//! sends a judgment turn, then scores the finished conversation with one of
//! the transcript judges. The scenario passes when the judge score reaches
//! its threshold.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crewcheck_core::{AgentAdapter, AgentInput, ChatMessage, CrewcheckError};
use crewcheck_judges::{JudgeKind, JudgeVerdict};
use crewcheck_logging::{TurnEvent, TurnEventLogger};

use crate::results::ResultsStore;
use crate::turn::{call_with_timeout, timestamp, turn_input};

/// Default pass mark for the built-in scenarios.
pub const DEFAULT_THRESHOLD: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    /// Append a customer message.
    User(String),
    /// Append a scripted agent message without calling the adapter.
    Agent(String),
    /// Let the adapter answer the conversation so far.
    Respond,
}

impl ScriptStep {
    pub fn user(text: impl Into<String>) -> Self {
        ScriptStep::User(text.into())
    }

    pub fn agent(text: impl Into<String>) -> Self {
        ScriptStep::Agent(text.into())
    }
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub script: Vec<ScriptStep>,
    pub judge: JudgeKind,
    pub threshold: f64,
}

/// Finished scenario: the conversation, the adapter's judgment summary and
/// the judge's verdict.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub success: bool,
    pub feedback: String,
    pub messages: Vec<ChatMessage>,
    pub summary: serde_json::Value,
    pub verdict: JudgeVerdict,
}

/// What gets persisted per scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
}

impl ScenarioRecord {
    fn from_outcome(outcome: &ScenarioOutcome) -> Self {
        Self {
            success: outcome.success,
            feedback: Some(outcome.feedback.clone()),
            message_count: Some(outcome.messages.len()),
            error: None,
            timestamp: timestamp(),
        }
    }

    fn from_error(err: &anyhow::Error) -> Self {
        Self {
            success: false,
            feedback: None,
            message_count: None,
            error: Some(err.to_string()),
            timestamp: timestamp(),
        }
    }
}

/// Replay `scenario` against `adapter`. At most `max_turns` adapter replies
/// are requested; extra `Respond` steps are skipped.
pub async fn run_scenario(
    adapter: &dyn AgentAdapter,
    scenario: &Scenario,
    max_turns: u32,
    turn_timeout: Option<Duration>,
) -> Result<ScenarioOutcome> {
    let thread_id = Uuid::new_v4().to_string();
    let mut messages: Vec<ChatMessage> = Vec::new();
    let mut seen = 0;
    let mut turns = 0u32;

    for step in &scenario.script {
        match step {
            ScriptStep::User(text) => messages.push(ChatMessage::user(text.clone())),
            ScriptStep::Agent(text) => messages.push(ChatMessage::assistant(text.clone())),
            ScriptStep::Respond => {
                if turns >= max_turns {
                    warn!(scenario = %scenario.name, max_turns, "Turn limit reached; skipping reply");
                    continue;
                }
                turns += 1;
                let input = turn_input(&thread_id, &messages, seen);
                seen = messages.len();
                let reply = call_with_timeout(adapter, input, turn_timeout).await?;
                let text = reply.text();
                TurnEventLogger::log_event(&thread_id, TurnEvent::Response { content: text.clone() });
                messages.push(ChatMessage::assistant(text));
            }
        }
    }

    let mut judgment = AgentInput::judgment(&thread_id, messages.clone());
    judgment.new_messages = messages.get(seen..).unwrap_or_default().to_vec();
    let summary_text = call_with_timeout(adapter, judgment, turn_timeout).await?.text();
    let summary = serde_json::from_str(&summary_text).unwrap_or(serde_json::Value::String(summary_text));

    let verdict = scenario.judge.evaluate(&messages);
    TurnEventLogger::log_event(
        &thread_id,
        TurnEvent::Judgment {
            judge: verdict.judge.to_string(),
            score: verdict.score,
        },
    );
    let success = verdict.passes(scenario.threshold);
    let feedback = feedback(&verdict, scenario.threshold);
    info!(scenario = %scenario.name, success, score = verdict.score, "Scenario finished");

    Ok(ScenarioOutcome {
        success,
        feedback,
        messages,
        summary,
        verdict,
    })
}

fn feedback(verdict: &JudgeVerdict, threshold: f64) -> String {
    let advice = verdict
        .report
        .get("recommendation")
        .and_then(|v| v.as_str())
        .or_else(|| {
            verdict
                .report
                .get("recommendations")
                .and_then(|v| v.get(0))
                .and_then(|v| v.as_str())
        })
        .unwrap_or_default();
    format!(
        "{} judge scored {:.1} against a threshold of {:.1}. {}",
        verdict.judge, verdict.score, threshold, advice
    )
    .trim_end()
    .to_string()
}

// ---------------------------------------------------------------------------
// Suites
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suite {
    Basic,
    EdgeCases,
    Escalation,
    Technical,
    All,
}

impl Suite {
    pub const NAMES: [&'static str; 5] = ["all", "basic", "edge_cases", "escalation", "technical"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Suite::Basic => "basic",
            Suite::EdgeCases => "edge_cases",
            Suite::Escalation => "escalation",
            Suite::Technical => "technical",
            Suite::All => "all",
        }
    }

    /// Scenarios in this suite, keyed by suite name.
    pub fn scenarios(&self) -> Vec<(&'static str, Scenario)> {
        match self {
            Suite::All => [Suite::Basic, Suite::EdgeCases, Suite::Escalation, Suite::Technical]
                .iter()
                .flat_map(|s| s.scenarios())
                .collect(),
            single => vec![(single.as_str(), single.scenario())],
        }
    }

    fn scenario(&self) -> Scenario {
        match self {
            Suite::Basic | Suite::All => Scenario {
                name: "basic customer service test".into(),
                description: "Customer has a simple login issue and needs help accessing their account. \
                              They are cooperative and follow instructions."
                    .into(),
                script: vec![
                    ScriptStep::user("Hi, I can't log into my account"),
                    ScriptStep::Respond,
                    ScriptStep::user("I tried resetting my password but the email never arrived"),
                    ScriptStep::Respond,
                    ScriptStep::user("Thank you, I'll try that now"),
                    ScriptStep::Respond,
                ],
                judge: JudgeKind::Quality,
                threshold: DEFAULT_THRESHOLD,
            },
            Suite::EdgeCases => Scenario {
                name: "angry customer edge case".into(),
                description: "Customer is extremely frustrated and angry about a recurring issue. \
                              They've been trying to resolve it for weeks and are threatening to cancel."
                    .into(),
                script: vec![
                    ScriptStep::user(
                        "This is the third time your service has failed me. I've been dealing with this for weeks and I'm about to cancel!",
                    ),
                    ScriptStep::Respond,
                    ScriptStep::user("I don't want excuses, I want it fixed today"),
                    ScriptStep::Respond,
                ],
                judge: JudgeKind::Quality,
                threshold: DEFAULT_THRESHOLD,
            },
            Suite::Escalation => Scenario {
                name: "escalation handling test".into(),
                description: "Customer has a complex issue that requires escalation to a manager.".into(),
                script: vec![
                    ScriptStep::user("I've been trying to resolve this issue for 3 weeks and nobody has helped me!"),
                    ScriptStep::agent("I understand your frustration. Let me try to help you with this issue."),
                    ScriptStep::user(
                        "No! I've talked to 5 different agents already. I want to speak to a manager RIGHT NOW!",
                    ),
                    ScriptStep::Respond,
                    ScriptStep::user("Fine. When will someone get back to me?"),
                    ScriptStep::Respond,
                ],
                judge: JudgeKind::Escalation,
                threshold: DEFAULT_THRESHOLD,
            },
            Suite::Technical => Scenario {
                name: "technical support test".into(),
                description: "Developer is having API integration issues with authentication errors.".into(),
                script: vec![
                    ScriptStep::user("I'm having trouble with your API integration"),
                    ScriptStep::agent("I can help with general API questions. What specific issue are you experiencing?"),
                    ScriptStep::user(
                        "I'm getting a 429 error with custom headers and my authentication keeps failing",
                    ),
                    ScriptStep::Respond,
                    ScriptStep::user("Which error code should I look for in the logs?"),
                    ScriptStep::Respond,
                ],
                judge: JudgeKind::Technical,
                threshold: DEFAULT_THRESHOLD,
            },
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Suite {
    type Err = CrewcheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Suite::All),
            "basic" => Ok(Suite::Basic),
            "edge_cases" => Ok(Suite::EdgeCases),
            "escalation" => Ok(Suite::Escalation),
            "technical" => Ok(Suite::Technical),
            other => Err(CrewcheckError::Config(format!(
                "unknown scenario suite '{other}' (expected one of: {})",
                Suite::NAMES.join(", ")
            ))),
        }
    }
}

/// Run every scenario in `suite`. A failing scenario is recorded and the
/// suite carries on. Results are written to `scenarios_*.json`.
pub async fn run_suite(
    adapter: &dyn AgentAdapter,
    suite: Suite,
    store: &ResultsStore,
    max_turns: u32,
    turn_timeout: Option<Duration>,
    mut on_result: impl FnMut(&str, &ScenarioRecord),
) -> Result<(BTreeMap<String, ScenarioRecord>, PathBuf)> {
    let mut results = BTreeMap::new();

    for (key, scenario) in suite.scenarios() {
        info!(scenario = key, "Running scenario");
        let record = match run_scenario(adapter, &scenario, max_turns, turn_timeout).await {
            Ok(outcome) => ScenarioRecord::from_outcome(&outcome),
            Err(e) => {
                warn!(scenario = key, error = %e, "Scenario errored");
                ScenarioRecord::from_error(&e)
            }
        };
        on_result(key, &record);
        results.insert(key.to_string(), record);
    }

    let passed = results.values().filter(|r| r.success).count();
    info!(passed, total = results.len(), suite = %suite, "Scenario suite complete");
    let path = store.write_json("scenarios", &results).await?;
    Ok((results, path))
}
