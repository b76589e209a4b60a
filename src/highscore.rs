//! The one persisted value: the best score ever reached.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_PATH: &str = "flappy_highscore.json";

pub trait HighScoreStore {
    /// Stored high score, 0 when nothing usable is stored.
    fn load(&self) -> u32;
    fn save(&mut self, high_score: u32) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Record {
    high_score: u32,
}

/// JSON file store: `{"high_score": N}`.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HighScoreStore for FileStore {
    fn load(&self) -> u32 {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                debug!("No high score at {}: {}", self.path.display(), e);
                return 0;
            }
        };
        match serde_json::from_str::<Record>(&text) {
            Ok(record) => record.high_score,
            Err(e) => {
                warn!(
                    "Ignoring unreadable high score file {}: {}",
                    self.path.display(),
                    e
                );
                0
            }
        }
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let text = serde_json::to_string(&Record { high_score })?;
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// Non-persistent store, also counts writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub value: u32,
    pub writes: usize,
}

impl MemoryStore {
    pub fn with_value(value: u32) -> Self {
        Self { value, writes: 0 }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u32 {
        self.value
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        self.value = high_score;
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "flappy_highscore_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn missing_file_reads_zero() {
        let store = FileStore::new(temp_file_path("missing"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn saved_value_reads_back() {
        let path = temp_file_path("roundtrip");
        let mut store = FileStore::new(&path);
        store.save(42).expect("save high score");
        assert_eq!(FileStore::new(&path).load(), 42);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn corrupt_file_reads_zero() {
        let path = temp_file_path("corrupt");
        fs::write(&path, "not json").expect("write temp file");
        assert_eq!(FileStore::new(&path).load(), 0);
        fs::write(&path, r#"{"high_score": -3}"#).expect("write temp file");
        assert_eq!(FileStore::new(&path).load(), 0);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn save_creates_parent_directory() {
        let dir = temp_file_path("dir");
        let path = dir.join("nested").join("best.json");
        let mut store = FileStore::new(&path);
        store.save(3).expect("save into fresh directory");
        assert_eq!(store.load(), 3);
        let _ = fs::remove_dir_all(dir);
    }
}
