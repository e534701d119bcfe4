//! File-based incident repository implementation

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::debug;

use intake_domain::repository::{mark_status, IncidentRepository};
use intake_types::{Error, IncidentReport, IncidentStatus, Result};

pub const INCIDENTS_FILE: &str = "incidents.json";

/// File-based implementation of IncidentRepository
///
/// Keeps every report in memory, keyed by id, and rewrites `incidents.json`
/// after each mutation.
pub struct FileIncidentRepository {
    store_path: PathBuf,
    reports: RefCell<HashMap<String, IncidentReport>>,
}

impl FileIncidentRepository {
    /// Create or load a repository in `store_dir`
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join(INCIDENTS_FILE);

        let reports = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader)?
        } else {
            HashMap::new()
        };
        debug!(
            "Opened incident store {} ({} reports)",
            store_path.display(),
            reports.len()
        );

        Ok(Self {
            store_path,
            reports: RefCell::new(reports),
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn len(&self) -> usize {
        self.reports.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.borrow().is_empty()
    }

    /// Save store to disk
    fn persist(&self) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &*self.reports.borrow())?;
        Ok(())
    }
}

impl IncidentRepository for FileIncidentRepository {
    fn insert(&self, report: &IncidentReport) -> Result<()> {
        self.reports
            .borrow_mut()
            .insert(report.id.clone(), report.clone());
        self.persist()
    }

    fn get_by_id(&self, id: &str) -> Result<Option<IncidentReport>> {
        Ok(self.reports.borrow().get(id).cloned())
    }

    fn list_all(&self) -> Result<Vec<IncidentReport>> {
        let mut reports: Vec<_> = self.reports.borrow().values().cloned().collect();
        reports.sort_by(|a, b| (a.timestamp, &a.id).cmp(&(b.timestamp, &b.id)));
        Ok(reports)
    }

    fn update_status(&self, id: &str, status: IncidentStatus) -> Result<IncidentReport> {
        let mut reports = self.reports.borrow_mut();
        let report = reports
            .get_mut(id)
            .ok_or_else(|| Error::IncidentNotFound(id.to_string()))?;
        mark_status(report, status);
        let updated = report.clone();
        drop(reports);
        self.persist()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_types::IncidentClassification;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_directory() {
        let dir = tempdir().unwrap();
        let store_dir = dir.path().join("nested").join("store");
        let repo = FileIncidentRepository::open(store_dir.clone()).unwrap();
        assert!(store_dir.is_dir());
        assert!(repo.is_empty());
        assert!(!repo.store_path().exists());
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(INCIDENTS_FILE), "not json").unwrap();
        let result = FileIncidentRepository::open(dir.path().to_path_buf());
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_update_status_unknown_id_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let repo = FileIncidentRepository::open(dir.path().to_path_buf()).unwrap();
        let result = repo.update_status("missing", IncidentStatus::Approved);
        assert!(matches!(result, Err(Error::IncidentNotFound(_))));
        assert!(!repo.store_path().exists());
    }

    #[test]
    fn test_list_all_oldest_first() {
        let dir = tempdir().unwrap();
        let repo = FileIncidentRepository::open(dir.path().to_path_buf()).unwrap();
        let mut first = IncidentReport::new(IncidentClassification::default());
        let second = IncidentReport::new(IncidentClassification::default());
        first.timestamp = second.timestamp - chrono::Duration::seconds(10);

        repo.insert(&second).unwrap();
        repo.insert(&first).unwrap();
        let ids: Vec<_> = repo.list_all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn test_list_all_same_timestamp_ordered_by_id() {
        let dir = tempdir().unwrap();
        let repo = FileIncidentRepository::open(dir.path().to_path_buf()).unwrap();
        let timestamp = chrono::Utc::now();
        let mut expected = Vec::new();
        for id in ["c", "a", "d", "b"] {
            let mut report = IncidentReport::new(IncidentClassification::default());
            report.id = id.to_string();
            report.timestamp = timestamp;
            repo.insert(&report).unwrap();
            expected.push(id.to_string());
        }
        expected.sort();

        let ids: Vec<_> = repo.list_all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, expected);
    }
}
