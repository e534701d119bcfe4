//! Repository trait definitions for incident persistence

use std::cell::RefCell;

use chrono::{DateTime, Utc};

use intake_types::{Error, IncidentReport, IncidentStatus, StatusNotification};

/// Repository for stored incident reports
pub trait IncidentRepository {
    /// Store a new report, replacing any report with the same id
    fn insert(&self, report: &IncidentReport) -> Result<(), Error>;

    /// Find a report by its id
    fn get_by_id(&self, id: &str) -> Result<Option<IncidentReport>, Error>;

    /// All reports, oldest first
    fn list_all(&self) -> Result<Vec<IncidentReport>, Error>;

    /// Set the status of a report and stamp the change time
    fn update_status(&self, id: &str, status: IncidentStatus) -> Result<IncidentReport, Error>;

    /// Status-change notifications stamped after `since`, oldest first
    fn recent_notifications(&self, since: DateTime<Utc>) -> Result<Vec<StatusNotification>, Error> {
        let mut notifications: Vec<StatusNotification> = self
            .list_all()?
            .iter()
            .filter_map(StatusNotification::for_report)
            .filter(|n| n.timestamp > since)
            .collect();
        notifications.sort_by_key(|n| n.timestamp);
        Ok(notifications)
    }
}

/// Apply a status change to a report in place
pub fn mark_status(report: &mut IncidentReport, status: IncidentStatus) {
    report.status = status;
    report.status_updated_at = Some(Utc::now());
}

/// Process-local repository, used by tests and one-shot runs
#[derive(Debug, Default)]
pub struct InMemoryIncidentRepository {
    reports: RefCell<Vec<IncidentReport>>,
}

impl InMemoryIncidentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IncidentRepository for InMemoryIncidentRepository {
    fn insert(&self, report: &IncidentReport) -> Result<(), Error> {
        let mut reports = self.reports.borrow_mut();
        match reports.iter_mut().find(|r| r.id == report.id) {
            Some(existing) => *existing = report.clone(),
            None => reports.push(report.clone()),
        }
        Ok(())
    }

    fn get_by_id(&self, id: &str) -> Result<Option<IncidentReport>, Error> {
        Ok(self.reports.borrow().iter().find(|r| r.id == id).cloned())
    }

    fn list_all(&self) -> Result<Vec<IncidentReport>, Error> {
        Ok(self.reports.borrow().clone())
    }

    fn update_status(&self, id: &str, status: IncidentStatus) -> Result<IncidentReport, Error> {
        let mut reports = self.reports.borrow_mut();
        let report = reports
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::IncidentNotFound(id.to_string()))?;
        mark_status(report, status);
        Ok(report.clone())
    }
}
