//! Categorized result accumulation and export

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{NameCheckError, Result};
use crate::types::{Availability, Category, CheckResult};

/// A candidate whose probe failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedCandidate {
    pub candidate: String,
    pub message: String,
}

impl std::fmt::Display for FailedCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.candidate, self.message)
    }
}

/// Insertion-ordered results of one check run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultStore {
    pub available: Vec<String>,
    pub unavailable: Vec<String>,
    pub errors: Vec<FailedCandidate>,
}

/// JSON report written by [`ResultStore::save_report`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultReport {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub results: ResultStore,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result to its category
    pub fn record(&mut self, result: &CheckResult) {
        match &result.availability {
            Availability::Available => self.available.push(result.candidate.clone()),
            Availability::Unavailable => self.unavailable.push(result.candidate.clone()),
            Availability::Error(message) => self.errors.push(FailedCandidate {
                candidate: result.candidate.clone(),
                message: message.clone(),
            }),
        }
    }

    /// Number of entries in a category
    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::Available => self.available.len(),
            Category::Unavailable => self.unavailable.len(),
            Category::Errors => self.errors.len(),
        }
    }

    /// Total entries across all categories
    pub fn total(&self) -> usize {
        self.available.len() + self.unavailable.len() + self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Export lines for a category; errors render as `candidate: message`
    pub fn lines(&self, category: Category) -> Vec<String> {
        match category {
            Category::Available => self.available.clone(),
            Category::Unavailable => self.unavailable.clone(),
            Category::Errors => self.errors.iter().map(ToString::to_string).collect(),
        }
    }

    /// Write a category to `path`, one entry per line, replacing any existing file
    ///
    /// Fails with [`NameCheckError::EmptyCategory`] without touching the
    /// filesystem when the category has no entries.
    pub fn export(&self, category: Category, path: &Path) -> Result<usize> {
        let lines = self.lines(category);
        if lines.is_empty() {
            return Err(NameCheckError::empty_category(category));
        }

        let mut content = lines.join("\n");
        content.push('\n');

        std::fs::write(path, content).map_err(|e| {
            NameCheckError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })?;

        tracing::info!(
            category = %category,
            entries = lines.len(),
            path = %path.display(),
            "Exported results"
        );
        Ok(lines.len())
    }

    /// Export every non-empty category into `dir` using default file names
    pub fn export_all(&self, dir: &Path) -> Result<Vec<(Category, PathBuf)>> {
        std::fs::create_dir_all(dir).map_err(|e| {
            NameCheckError::io(e.to_string(), Some(dir.to_string_lossy().to_string()))
        })?;

        let mut written = Vec::new();
        for category in Category::ALL {
            let path = dir.join(category.default_file_name());
            match self.export(category, &path) {
                Ok(_) => written.push((category, path)),
                Err(e) if e.is_informational() => {
                    tracing::debug!(category = %category, "Skipping empty category");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(written)
    }

    /// Save the whole store as a pretty JSON report
    pub fn save_report(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                NameCheckError::io(e.to_string(), Some(parent.to_string_lossy().to_string()))
            })?;
        }

        let report = ResultReport {
            generated_at: Utc::now(),
            results: self.clone(),
        };
        let content = serde_json::to_string_pretty(&report).map_err(|e| {
            NameCheckError::internal(format!("Failed to serialize report: {}", e))
        })?;

        std::fs::write(path, content).map_err(|e| {
            NameCheckError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> ResultStore {
        let mut store = ResultStore::new();
        store.record(&CheckResult::new("free1", Availability::Available));
        store.record(&CheckResult::new("taken1", Availability::Unavailable));
        store.record(&CheckResult::new("flaky", Availability::Error("timed out".to_string())));
        store.record(&CheckResult::new("free2", Availability::Available));
        store
    }

    #[test]
    fn test_record_keeps_insertion_order() {
        let store = sample_store();
        assert_eq!(store.available, vec!["free1", "free2"]);
        assert_eq!(store.unavailable, vec!["taken1"]);
        assert_eq!(store.lines(Category::Errors), vec!["flaky: timed out"]);
        assert_eq!(store.total(), 4);
    }

    #[test]
    fn test_record_does_not_dedup() {
        let mut store = ResultStore::new();
        store.record(&CheckResult::new("same", Availability::Unavailable));
        store.record(&CheckResult::new("same", Availability::Unavailable));
        assert_eq!(store.len(Category::Unavailable), 2);
    }

    #[test]
    fn test_export_empty_category_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("available.txt");
        let store = ResultStore::new();

        let err = store.export(Category::Available, &path).unwrap_err();
        assert!(matches!(err, NameCheckError::EmptyCategory { category: Category::Available }));
        assert!(!path.exists());
    }

    #[test]
    fn test_export_writes_lines_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.txt");
        std::fs::write(&path, "stale content that is longer than the export\n").unwrap();

        let written = sample_store().export(Category::Errors, &path).unwrap();
        assert_eq!(written, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "flaky: timed out\n");
    }

    #[test]
    fn test_export_twice_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("available.txt");
        let store = sample_store();

        store.export(Category::Available, &path).unwrap();
        let first = std::fs::read(&path).unwrap();
        store.export(Category::Available, &path).unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, b"free1\nfree2\n");
    }

    #[test]
    fn test_export_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        let err = sample_store().export(Category::Available, &path).unwrap_err();
        assert!(matches!(err, NameCheckError::Io { .. }));
    }

    #[test]
    fn test_export_all_skips_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ResultStore::new();
        store.record(&CheckResult::new("taken", Availability::Unavailable));

        let written = store.export_all(&dir.path().join("out")).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, Category::Unavailable);
        assert!(written[0].1.ends_with("unavailable.txt"));
        assert!(!dir.path().join("out").join("available.txt").exists());
    }

    #[test]
    fn test_report_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("run.json");
        let store = sample_store();

        store.save_report(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let report: ResultReport = serde_json::from_str(&content).unwrap();
        assert_eq!(report.results, store);
    }
}
