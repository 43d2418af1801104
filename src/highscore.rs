use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::SnakeError;

const SENTINEL_NAME: &str = "---";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HighscoreRecord {
    pub name: String,
    pub score: u32,
}

impl HighscoreRecord {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        HighscoreRecord { name: name.into(), score }
    }
}

/// The "no high score yet" record.
impl Default for HighscoreRecord {
    fn default() -> Self {
        HighscoreRecord::new(SENTINEL_NAME, 0)
    }
}

/// Somewhere a high score survives between runs.
///
/// Neither method reports failure: a store that can't be read loads as the
/// default record, and a failed save is dropped.
pub trait HighscoreStore {
    fn load(&self) -> HighscoreRecord;
    fn save(&mut self, record: &HighscoreRecord);
}

/// A JSON file holding a single `{"name": ..., "score": ...}` object.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<HighscoreRecord, SnakeError> {
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn write(&self, record: &HighscoreRecord) -> Result<(), SnakeError> {
        let text = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl HighscoreStore for JsonFileStore {
    fn load(&self) -> HighscoreRecord {
        match self.read() {
            Ok(record) => {
                debug!("loaded highscore {:?} from {}", record, self.path.display());
                record
            },
            Err(e) if e.is_not_found() => {
                debug!("no highscore file at {}", self.path.display());
                HighscoreRecord::default()
            },
            Err(e) => {
                warn!("ignoring highscore file {}: {}", self.path.display(), e);
                HighscoreRecord::default()
            },
        }
    }

    fn save(&mut self, record: &HighscoreRecord) {
        match self.write(record) {
            Ok(()) => info!("saved highscore {} by {} to {}", record.score, record.name, self.path.display()),
            Err(e) => warn!("could not save highscore to {}: {}", self.path.display(), e),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::env;

    /// In-memory store that remembers every save.
    #[derive(Default)]
    pub struct RecordingStore {
        pub stored: HighscoreRecord,
        pub saves: Vec<HighscoreRecord>,
    }

    impl RecordingStore {
        pub fn with(record: HighscoreRecord) -> Self {
            RecordingStore { stored: record, saves: vec![] }
        }
    }

    impl HighscoreStore for RecordingStore {
        fn load(&self) -> HighscoreRecord {
            self.stored.clone()
        }

        fn save(&mut self, record: &HighscoreRecord) {
            self.stored = record.clone();
            self.saves.push(record.clone());
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("snake-{}-{}.json", std::process::id(), name));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn missing_file_loads_the_sentinel() {
        let store = JsonFileStore::new(temp_path("missing"));
        assert_eq!(store.load(), HighscoreRecord::new("---", 0));
    }

    #[test]
    fn corrupt_file_loads_the_sentinel() {
        let path = temp_path("corrupt");
        fs::write(&path, "{\"name\": \"Ace\", \"sco").unwrap();
        assert_eq!(JsonFileStore::new(&path).load(), HighscoreRecord::default());

        fs::write(&path, "{\"name\": \"Ace\", \"score\": -3}").unwrap();
        assert_eq!(JsonFileStore::new(&path).load(), HighscoreRecord::default());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn saved_record_loads_back() {
        let path = temp_path("roundtrip");
        let mut store = JsonFileStore::new(&path);
        store.save(&HighscoreRecord::new("Ace", 10));

        let text = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["name"], "Ace");
        assert_eq!(value["score"], 10);

        assert_eq!(JsonFileStore::new(&path).load(), HighscoreRecord::new("Ace", 10));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn failed_save_is_swallowed() {
        // A directory can't be written as a file.
        let dir = env::temp_dir().join(format!("snake-{}-dir", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let mut store = JsonFileStore::new(&dir);
        store.save(&HighscoreRecord::new("Ace", 10));
        assert_eq!(store.load(), HighscoreRecord::default());

        let _ = fs::remove_dir(&dir);
    }
}
