//! Leaderboard persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Atomic writes (tmp -> save)
//! - Missing file reads as an empty leaderboard

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::highscores::{HighScoreEntry, HighScores, ScoreStore};

/// Current score file format
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    scores: HighScores,
}

/// [`ScoreStore`] backed by a JSON file. Every upsert rewrites the file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the leaderboard; a missing file is an empty one
    pub fn load(&self) -> Result<HighScores, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No score file at {}, starting fresh", self.path.display());
                return Ok(HighScores::new());
            }
            Err(e) => return Err(e.into()),
        };
        let envelope: Envelope = serde_json::from_str(&json)?;
        if envelope.version != FORMAT_VERSION {
            return Err(StoreError::Unavailable(format!(
                "unsupported score file version {} in {}",
                envelope.version,
                self.path.display()
            )));
        }
        let mut scores = envelope.scores;
        scores.sort();
        log::debug!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    /// Write the leaderboard to a temp file, then move it over the old one
    pub fn save(&self, scores: &HighScores) -> Result<(), StoreError> {
        let envelope = Envelope {
            version: FORMAT_VERSION,
            scores: scores.clone(),
        };
        let json = serde_json::to_string_pretty(&envelope)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("High scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn upsert_best(&mut self, username: &str, score: u32, count: u32) -> Result<bool, StoreError> {
        let mut scores = self.load()?;
        if !scores.upsert_best(username, score, count) {
            log::debug!("{} kept their best result", username);
            return Ok(false);
        }
        self.save(&scores)?;
        Ok(true)
    }

    fn list_all(&self) -> Result<Vec<HighScoreEntry>, StoreError> {
        Ok(self.load()?.list_all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> JsonFileStore {
        let dir = std::env::temp_dir().join(format!(
            "lasso_orbs_store_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        JsonFileStore::new(dir.join("scores.json"))
    }

    fn cleanup(store: &JsonFileStore) {
        if let Some(dir) = store.path().parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = temp_store("missing");
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_upsert_persists_across_instances() {
        let mut store = temp_store("persist");
        assert!(store.upsert_best("ann", 12, 3).unwrap());
        assert!(store.upsert_best("bob", 20, 1).unwrap());
        assert!(!store.upsert_best("ann", 11, 9).unwrap());

        let reopened = JsonFileStore::new(store.path().to_path_buf());
        let entries = reopened.list_all().unwrap();
        cleanup(&store);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].username, "bob");
        assert_eq!(entries[1].score, 12);
        assert_eq!(entries[1].count, 3);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let mut store = temp_store("tmp");
        store.upsert_best("ann", 1, 1).unwrap();
        let tmp = store.path().with_extension("json.tmp");
        let exists = tmp.exists();
        cleanup(&store);
        assert!(!exists);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let mut store = temp_store("corrupt");
        if let Some(dir) = store.path().parent() {
            fs::create_dir_all(dir).unwrap();
        }
        fs::write(store.path(), "{ not json").unwrap();
        let result = store.upsert_best("ann", 5, 1);
        let listed = store.list_all();
        cleanup(&store);
        assert!(matches!(result, Err(StoreError::Json(_))));
        assert!(listed.is_err());
    }

    #[test]
    fn test_unknown_version_rejected() {
        let store = temp_store("version");
        if let Some(dir) = store.path().parent() {
            fs::create_dir_all(dir).unwrap();
        }
        fs::write(store.path(), r#"{"version": 99, "scores": {"entries": []}}"#).unwrap();
        let result = store.load();
        cleanup(&store);
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
