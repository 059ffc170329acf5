//! CLI Judge Command
//!
//! Scores a conversation saved as JSON with one or all of the judges.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crewcheck_core::ChatMessage;
use crewcheck_judges::{
    quality_prompt, EscalationTiming, JudgeKind, JudgeVerdict, Transcript, QUALITY_CRITERIA,
};
use crewcheck_logging::{TurnEvent, TurnEventLogger};

use crate::terminal_output::{note_info, note_success, print_panel, render_table, Column, CYAN, DIM};
use crate::Runtime;

#[derive(Deserialize)]
#[serde(untagged)]
enum ConversationFile {
    Messages(Vec<ChatMessage>),
    Wrapped { messages: Vec<ChatMessage> },
}

pub async fn run(runtime: &Runtime, file: &Path, kind: Option<JudgeKind>, prompt: bool) -> Result<()> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read conversation file {}", file.display()))?;
    let messages = parse_conversation(&raw)
        .with_context(|| format!("Invalid conversation file {}", file.display()))?;

    if prompt {
        print_panel(
            "Quality evaluator prompt",
            &quality_prompt(&Transcript::from_messages(&messages), &QUALITY_CRITERIA),
            DIM,
        );
    }

    let kinds = match kind {
        Some(kind) => vec![kind],
        None => JudgeKind::ALL.to_vec(),
    };
    let source = file.display().to_string();
    let verdicts: Vec<JudgeVerdict> = kinds
        .iter()
        .map(|kind| {
            let verdict = kind.evaluate(&messages);
            TurnEventLogger::log_event(
                &source,
                TurnEvent::Judgment {
                    judge: kind.as_str().to_string(),
                    score: verdict.score,
                },
            );
            verdict
        })
        .collect();

    for verdict in &verdicts {
        print_panel(
            &format!("{} judge", verdict.judge),
            &serde_json::to_string_pretty(&verdict.report)?,
            CYAN,
        );
        if let Some(note) = timing_note(verdict) {
            note_info(&note);
        }
    }
    println!();
    print!("{}", render_scores(&verdicts));

    let path = runtime.store.write_json("judgments", &verdicts).await?;
    note_success(&format!("Judgments saved to {}", path.display()));
    Ok(())
}

fn parse_conversation(raw: &str) -> Result<Vec<ChatMessage>> {
    let messages = match serde_json::from_str::<ConversationFile>(raw)? {
        ConversationFile::Messages(m) | ConversationFile::Wrapped { messages: m } => m,
    };
    if messages.is_empty() {
        bail!("conversation has no messages");
    }
    Ok(messages)
}

/// Human-readable escalation timing for an escalation verdict.
fn timing_note(verdict: &JudgeVerdict) -> Option<String> {
    let timing = verdict.report.get("escalation_timing")?;
    let timing: EscalationTiming = serde_json::from_value(timing.clone()).ok()?;
    Some(format!("Escalation timing: {}", timing.description()))
}

fn render_scores(verdicts: &[JudgeVerdict]) -> String {
    let columns = vec![Column::left("Judge"), Column::right("Score")];
    let rows: Vec<Vec<String>> = verdicts
        .iter()
        .map(|v| vec![v.judge.to_string(), format!("{:.1}", v.score)])
        .collect();
    render_table(&columns, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal_output::strip_ansi;

    #[test]
    fn accepts_bare_array_and_wrapped_object() {
        let bare = r#"[{"role": "user", "content": "hi"}, {"role": "assistant", "content": "hello"}]"#;
        assert_eq!(parse_conversation(bare).unwrap().len(), 2);

        let wrapped = r#"{"messages": [{"role": "user", "content": "hi"}], "thread": "x"}"#;
        let messages = parse_conversation(wrapped).unwrap();
        assert_eq!(messages, vec![ChatMessage::user("hi")]);
    }

    #[test]
    fn rejects_empty_or_malformed() {
        assert!(parse_conversation("[]").is_err());
        assert!(parse_conversation(r#"{"messages": "nope"}"#).is_err());
        assert!(parse_conversation(r#"[{"role": "robot", "content": "x"}]"#).is_err());
    }

    #[test]
    fn escalation_verdict_gets_timing_note() {
        let messages = vec![
            ChatMessage::user("I want a manager right now"),
            ChatMessage::assistant("Connecting you."),
        ];
        let escalation = JudgeKind::Escalation.evaluate(&messages);
        assert_eq!(
            timing_note(&escalation).as_deref(),
            Some("Escalation timing: Too early - should attempt resolution first")
        );
        assert!(timing_note(&JudgeKind::Quality.evaluate(&messages)).is_none());
    }

    #[test]
    fn score_table_lists_each_judge() {
        let messages = vec![
            ChatMessage::user("My API key stopped working"),
            ChatMessage::assistant("Let me help. First step, regenerate the key. Second step, retry."),
        ];
        let verdicts: Vec<JudgeVerdict> = JudgeKind::ALL.iter().map(|k| k.evaluate(&messages)).collect();
        let table = strip_ansi(&render_scores(&verdicts));
        for kind in JudgeKind::ALL {
            assert!(table.contains(kind.as_str()));
        }
        assert_eq!(table.lines().count(), 5);
    }
}
