//! Persistent history backed by a JSON file.
//!
//! The file is read once at the start of a run and written once at the end.
//! Writes go to a sibling temporary file that is then renamed over the
//! target, so a crash mid-write leaves the previous history intact.

use std::path::{Path, PathBuf};

use crate::error::{HistoryError, HistoryResult};
use crate::history::History;
use crate::tally::DailyCounts;

/// Location of a history file.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the history. A missing file is an empty history.
    pub fn load(&self) -> HistoryResult<History> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "no history yet, starting empty");
            return Ok(History::new());
        }
        let history: History = read_json(&self.path)?;
        history.validate()?;
        Ok(history)
    }

    /// Write the whole history atomically.
    pub fn save(&self, history: &History) -> HistoryResult<()> {
        history.validate()?;
        write_json_atomic(&self.path, history)
    }
}

/// Read a counts file: a flat JSON object of label to count.
pub fn load_counts(path: &Path) -> HistoryResult<DailyCounts> {
    read_json(path)
}

/// Write a counts file atomically.
pub fn save_counts(path: &Path, counts: &DailyCounts) -> HistoryResult<()> {
    write_json_atomic(path, counts)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> HistoryResult<T> {
    let data = std::fs::read_to_string(path).map_err(|e| HistoryError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&data).map_err(|e| HistoryError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> HistoryResult<()> {
    let io_err = |p: &Path, e: std::io::Error| HistoryError::Io {
        path: p.display().to_string(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|e| HistoryError::Parse {
        path: path.display().to_string(),
        message: format!("serialize: {e}"),
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "history.json".into());
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&tmp, json).map_err(|e| io_err(tmp.as_path(), e))?;
    std::fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
    tracing::debug!(path = %path.display(), "wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn missing_file_is_empty_history() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_preserves_history() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("nested/history.json"));

        let mut history = History::new();
        history
            .record_day(d("2025-08-13"), &DailyCounts::from([("React", 3)]))
            .unwrap();
        store.save(&history).unwrap();

        assert_eq!(store.load().unwrap(), history);
        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(leftovers, vec!["history.json"]);
    }

    #[test]
    fn corrupt_file_is_rejected_on_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(
            &path,
            r#"{"dates": ["2025-08-12", "2025-08-13"], "series": {"A": [1]}}"#,
        )
        .unwrap();
        let err = HistoryStore::new(&path).load().unwrap_err();
        assert!(matches!(err, HistoryError::Corrupt { .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = HistoryStore::new(&path).load().unwrap_err();
        assert!(matches!(err, HistoryError::Parse { .. }));
    }

    #[test]
    fn counts_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tech_counts.json");
        let counts = DailyCounts::from([("AWS", 2), ("Azure", 1)]);
        save_counts(&path, &counts).unwrap();
        assert_eq!(load_counts(&path).unwrap(), counts);
    }
}
