//! Timestamped JSON result files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use tracing::info;

/// Writes run artifacts into one directory as `{prefix}_{YYYYmmdd_HHMMSS}.json`.
#[derive(Debug, Clone)]
pub struct ResultsStore {
    dir: PathBuf,
}

impl ResultsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for a run with this prefix started now.
    pub fn file_name(prefix: &str) -> String {
        format!("{prefix}_{}.json", Local::now().format("%Y%m%d_%H%M%S"))
    }

    /// Serialize `value` as pretty JSON into a new timestamped file, creating
    /// the directory if needed. Returns the written path.
    pub async fn write_json<T: Serialize + ?Sized>(&self, prefix: &str, value: &T) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create results directory {}", self.dir.display()))?;
        let path = self.dir.join(Self::file_name(prefix));
        let json = serde_json::to_string_pretty(value).context("Failed to encode results")?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Results saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_has_timestamp() {
        let name = ResultsStore::file_name("basic_demo");
        assert!(name.starts_with("basic_demo_"));
        assert!(name.ends_with(".json"));
        // basic_demo_ + 8 digits + _ + 6 digits + .json
        assert_eq!(name.len(), "basic_demo_".len() + 15 + ".json".len());
    }

    #[tokio::test]
    async fn writes_pretty_json_into_new_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ResultsStore::new(tmp.path().join("results"));
        let path = store
            .write_json("scenarios", &serde_json::json!({"basic": {"success": true}}))
            .await
            .unwrap();
        assert!(path.starts_with(store.dir()));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"basic\""));
        let back: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back["basic"]["success"], true);
    }
}
