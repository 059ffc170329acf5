//! Drives an [`AgentAdapter`](crewcheck_core::AgentAdapter) through the
//! canned demo, an interactive chat session and scripted scenario suites,
//! persisting every run as a timestamped JSON file.

pub mod demo;
pub mod interactive;
pub mod results;
pub mod scenarios;
pub mod turn;

pub use demo::{run_basic_demo, DemoRecord, DEMO_INQUIRIES};
pub use interactive::{run_interactive, HistoryEntry};
pub use results::ResultsStore;
pub use scenarios::{run_suite, Scenario, ScenarioOutcome, ScenarioRecord, ScriptStep, Suite};
pub use turn::{call_with_timeout, timestamp, turn_input};
