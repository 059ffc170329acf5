//! CLI Interactive Command

use anyhow::Result;
use tokio::io::BufReader;
use tracing::info;

use crewcheck_runner::run_interactive;

use crate::Runtime;

/// Chat over stdin/stdout until `quit`, EOF or Ctrl-C.
pub async fn run(runtime: &Runtime) -> Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let mut writer = tokio::io::stdout();
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    let saved = run_interactive(
        &runtime.adapter,
        reader,
        &mut writer,
        &runtime.store,
        runtime.config.turn_timeout(),
        shutdown,
    )
    .await?;

    if let Some(path) = saved {
        info!(path = %path.display(), "Interactive session saved");
    }
    Ok(())
}
