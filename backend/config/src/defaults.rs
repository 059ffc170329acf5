//! Built-in configuration values.

pub const DEFAULT_RESULTS_DIR: &str = "results";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_JUDGE_MODEL: &str = "openai/gpt-4o";
pub const DEFAULT_SIMULATOR_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_MAX_TURNS: u32 = 10;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "crewcheck.yaml";
