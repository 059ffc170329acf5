//! Interactive chat loop over any async line source.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};
use uuid::Uuid;

use crewcheck_core::{AgentAdapter, ChatMessage, DEFAULT_CUSTOMER_ID};
use crewcheck_logging::{TurnEvent, TurnEventLogger};

use crate::results::ResultsStore;
use crate::turn::{call_with_timeout, timestamp, turn_input};

/// Agent text longer than this is cut short in the `history` listing.
const HISTORY_PREVIEW_CHARS: usize = 100;

const HELP: &str = "\
Available commands:
- help: Show this help message
- history: Show conversation history
- clear: Clear conversation history
- quit/exit/q: Exit interactive mode

Just type your message to chat with the customer service system!";

/// One exchange. Exactly one of `agent` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
}

enum Command {
    Quit,
    Help,
    History,
    Clear,
    Say(String),
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(match line.to_lowercase().as_str() {
        "quit" | "exit" | "q" => Command::Quit,
        "help" => Command::Help,
        "history" => Command::History,
        "clear" => Command::Clear,
        _ => Command::Say(line.to_string()),
    })
}

fn preview(text: &str) -> String {
    if text.chars().count() > HISTORY_PREVIEW_CHARS {
        let cut: String = text.chars().take(HISTORY_PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

fn render_history(history: &[HistoryEntry]) -> String {
    if history.is_empty() {
        return "No conversation history yet.\n".to_string();
    }
    let mut out = String::from("\n--- Conversation History ---\n");
    for (i, entry) in history.iter().enumerate() {
        out.push_str(&format!("\n{}. You: {}\n", i + 1, entry.user));
        match (&entry.agent, &entry.error) {
            (Some(agent), _) => out.push_str(&format!("   Agent: {}\n", preview(agent))),
            (None, Some(error)) => out.push_str(&format!("   Error: {error}\n")),
            (None, None) => {}
        }
    }
    out
}

/// Chat with `adapter` until `quit`, end of input or `shutdown` resolves.
///
/// All turns share one conversation thread; `clear` starts a new one. A
/// non-empty session is written to `interactive_session_*.json` and its path
/// returned.
pub async fn run_interactive<R, W, S>(
    adapter: &dyn AgentAdapter,
    reader: R,
    writer: &mut W,
    store: &ResultsStore,
    turn_timeout: Option<Duration>,
    shutdown: S,
) -> Result<Option<PathBuf>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut lines = reader.lines();
    let mut history: Vec<HistoryEntry> = Vec::new();
    let mut thread_id = Uuid::new_v4().to_string();
    let mut messages: Vec<ChatMessage> = Vec::new();
    let mut seen = 0;

    writer
        .write_all(b"Interactive mode - Chat with the customer service system\nType 'quit' to exit, 'help' for commands\n")
        .await?;

    loop {
        writer.write_all(b"\nYou: ").await?;
        writer.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read input")?,
            _ = &mut shutdown => {
                info!("Interactive session interrupted");
                None
            }
        };
        let Some(line) = line else { break };

        let text = match parse_command(&line) {
            None => continue,
            Some(Command::Quit) => break,
            Some(Command::Help) => {
                writer.write_all(format!("{HELP}\n").as_bytes()).await?;
                continue;
            }
            Some(Command::History) => {
                writer.write_all(render_history(&history).as_bytes()).await?;
                continue;
            }
            Some(Command::Clear) => {
                history.clear();
                messages.clear();
                seen = 0;
                thread_id = Uuid::new_v4().to_string();
                writer.write_all(b"Conversation history cleared\n").await?;
                continue;
            }
            Some(Command::Say(text)) => text,
        };

        TurnEventLogger::log_event(
            &thread_id,
            TurnEvent::Inquiry {
                customer_id: DEFAULT_CUSTOMER_ID.to_string(),
                content: text.clone(),
            },
        );
        messages.push(ChatMessage::user(text.clone()));
        let input = turn_input(&thread_id, &messages, seen);
        seen = messages.len();

        match call_with_timeout(adapter, input, turn_timeout).await {
            Ok(reply) => {
                let response = reply.text();
                TurnEventLogger::log_event(&thread_id, TurnEvent::Response { content: response.clone() });
                writer.write_all(format!("\nAgent: {response}\n").as_bytes()).await?;
                messages.push(ChatMessage::assistant(response.clone()));
                history.push(HistoryEntry {
                    user: text,
                    agent: Some(response),
                    error: None,
                    timestamp: timestamp(),
                });
            }
            Err(e) => {
                warn!(error = %e, "Interactive turn failed");
                TurnEventLogger::log_event(&thread_id, TurnEvent::Error { error_msg: e.to_string() });
                writer.write_all(format!("Error: {e}\n").as_bytes()).await?;
                history.push(HistoryEntry {
                    user: text,
                    agent: None,
                    error: Some(e.to_string()),
                    timestamp: timestamp(),
                });
            }
        }
    }

    let saved = if history.is_empty() {
        None
    } else {
        let path = store.write_json("interactive_session", &history).await?;
        writer
            .write_all(format!("\nConversation saved to: {}\n", path.display()).as_bytes())
            .await?;
        Some(path)
    };
    writer.write_all(b"Goodbye!\n").await?;
    writer.flush().await?;
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crewcheck_core::{AgentInput, AgentReply};
    use std::sync::Mutex;

    /// Replies with the number of messages it was shown and records thread ids.
    #[derive(Default)]
    struct Counter {
        threads: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AgentAdapter for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        async fn call(&self, input: AgentInput) -> AgentReply {
            self.threads.lock().unwrap().push(input.thread_id.clone());
            AgentReply::Text(format!("seen {} new {}", input.messages.len(), input.new_messages.len()))
        }
    }

    async fn run_script(adapter: &dyn AgentAdapter, script: &str, store: &ResultsStore) -> (Option<PathBuf>, String) {
        let mut out = Vec::new();
        let saved = run_interactive(
            adapter,
            script.as_bytes(),
            &mut out,
            store,
            None,
            std::future::pending::<()>(),
        )
        .await
        .unwrap();
        (saved, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn conversation_is_saved_on_quit() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultsStore::new(tmp.path());
        let adapter = Counter::default();
        let (saved, out) = run_script(&adapter, "hello\n\nagain\nhistory\nquit\nnever sent\n", &store).await;

        assert!(out.contains("Agent: seen 1 new 1"));
        assert!(out.contains("Agent: seen 3 new 2"));
        assert!(out.contains("--- Conversation History ---"));
        assert!(out.contains("2. You: again"));
        assert!(out.trim_end().ends_with("Goodbye!"));

        let path = saved.unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("interactive_session_"));
        let entries: Vec<HistoryEntry> = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].user, "hello");
        assert_eq!(entries[1].agent.as_deref(), Some("seen 3 new 2"));

        let threads = adapter.threads.lock().unwrap();
        assert_eq!(threads[0], threads[1]);
    }

    #[tokio::test]
    async fn commands_only_session_saves_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultsStore::new(tmp.path().join("results"));
        let (saved, out) = run_script(&Counter::default(), "help\nhistory\nEXIT\n", &store).await;
        assert!(saved.is_none());
        assert!(out.contains("Available commands:"));
        assert!(out.contains("No conversation history yet."));
        assert!(!tmp.path().join("results").exists());
    }

    #[tokio::test]
    async fn clear_starts_a_new_thread() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultsStore::new(tmp.path());
        let adapter = Counter::default();
        let (saved, out) = run_script(&adapter, "one\nclear\ntwo\n", &store).await;

        assert!(out.contains("Conversation history cleared"));
        let entries: Vec<HistoryEntry> =
            serde_json::from_str(&std::fs::read_to_string(saved.unwrap()).unwrap()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].agent.as_deref(), Some("seen 1 new 1"));
        let threads = adapter.threads.lock().unwrap();
        assert_ne!(threads[0], threads[1]);
    }

    #[tokio::test]
    async fn shutdown_ends_session_and_saves() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultsStore::new(tmp.path());
        let (client, server) = tokio::io::duplex(64);
        let (mut client_read, mut client_write) = tokio::io::split(client);
        client_write.write_all(b"hi there\n").await.unwrap();

        let drain = tokio::spawn(async move {
            let mut buf = Vec::new();
            tokio::io::AsyncReadExt::read_to_end(&mut client_read, &mut buf).await.ok();
        });

        let (server_read, mut server_write) = tokio::io::split(server);
        let saved = run_interactive(
            &Counter::default(),
            tokio::io::BufReader::new(server_read),
            &mut server_write,
            &store,
            None,
            tokio::time::sleep(Duration::from_millis(100)),
        )
        .await
        .unwrap();
        drop(server_write);
        drop(client_write);
        drain.abort();

        assert!(saved.is_some());
    }

    #[test]
    fn history_preview_truncates_long_replies() {
        let long = "x".repeat(150);
        let text = render_history(&[HistoryEntry {
            user: "u".into(),
            agent: Some(long),
            error: None,
            timestamp: "t".into(),
        }]);
        assert!(text.contains(&format!("Agent: {}...", "x".repeat(100))));
        assert!(!text.contains(&"x".repeat(101)));
    }
}
