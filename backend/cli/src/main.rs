mod demo_cmd;
mod info_cmd;
mod interactive_cmd;
mod judge_cmd;
mod terminal_output;
mod test_cmd;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing::info;

use crewcheck_adapter::{CrewAdapter, ThreadStoreConfig};
use crewcheck_config::{validate, CrewcheckConfig};
use crewcheck_judges::JudgeKind;
use crewcheck_runner::{ResultsStore, Suite};

use terminal_output::note_warn;

#[derive(Parser)]
#[command(name = "crewcheck")]
#[command(about = "Customer-service crew demo, scenario runner and judges")]
#[command(version)]
struct Cli {
    /// YAML config file (defaults to ./crewcheck.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send the canned inquiries to the crew
    Demo,
    /// Run a scripted scenario suite
    Test {
        /// all, basic, edge_cases, escalation or technical
        #[arg(default_value = "all")]
        suite: Suite,
        /// Talk to a single crew role (e.g. "Technical Support Specialist")
        /// instead of the whole crew
        #[arg(long)]
        agent: Option<String>,
    },
    /// Chat with the crew from the terminal
    Interactive,
    /// Show the effective configuration
    Info,
    /// Score a saved conversation
    Judge {
        /// JSON array of messages, or an object with a "messages" array
        #[arg(short, long)]
        file: PathBuf,
        /// quality, technical or escalation (all three when omitted)
        #[arg(short, long)]
        kind: Option<JudgeKind>,
        /// Also print the evaluator prompt for a model-backed quality judge
        #[arg(long)]
        prompt: bool,
    },
}

/// Everything a command needs, built once from the loaded config.
pub struct Runtime {
    pub config: CrewcheckConfig,
    pub adapter: CrewAdapter,
    pub store: ResultsStore,
}

impl Runtime {
    fn new(config: CrewcheckConfig) -> Self {
        let adapter = CrewAdapter::with_default_crew(ThreadStoreConfig {
            max_threads: config.max_threads,
            idle_ttl: config.thread_idle_ttl(),
        });
        let store = ResultsStore::new(config.results_dir.clone());
        Self { config, adapter, store }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env = crewcheck_config::process_env();
    let config = crewcheck_config::load(cli.config.as_deref(), &env)
        .await
        .context("Failed to load configuration")?;

    crewcheck_logging::init_logger(&config.log_dir, config.effective_log_level())?;
    for warning in validate(&config).warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    info!(results_dir = %config.results_dir.display(), "crewcheck starting");

    let runtime = Runtime::new(config);

    match cli.command {
        Some(Commands::Demo) => demo_cmd::run(&runtime).await,
        Some(Commands::Test { suite, agent }) => test_cmd::run(&runtime, suite, agent.as_deref()).await,
        Some(Commands::Interactive) => interactive_cmd::run(&runtime).await,
        Some(Commands::Info) => info_cmd::run(&runtime.config),
        Some(Commands::Judge { file, kind, prompt }) => judge_cmd::run(&runtime, &file, kind, prompt).await,
        None => {
            Cli::command().print_help()?;
            println!();
            demo_cmd::run(&runtime).await
        }
    }
}
