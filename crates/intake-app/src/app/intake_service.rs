//! Intake Service - Core Use Case for Incident Reports
//!
//! This service orchestrates the intake workflow:
//! 1. Classify the incident photo's annotation bundle
//! 2. Extract registration card fields (OCR text or pre-parsed)
//! 3. Validate the reported GPS position
//! 4. Store the report as pending, recording any failures in `errors`
//!
//! It also covers the receiving side of the relay and status tracking.

use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use serde_json::{json, Value};
use thiserror::Error;

use intake_domain::repository::IncidentRepository;
use intake_domain::{classify, extract_registration_info};
use intake_types::{
    AnnotationBundle, Coordinates, Error, IncidentClassification, IncidentReport, IncidentStatus,
    LocationInfo, RegistrationInfo, StatusNotification,
};

/// Errors specific to the intake service
#[derive(Debug, Error)]
pub enum IntakeServiceError {
    #[error("Missing payload section: {0}")]
    MissingSection(&'static str),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Incident not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store error: {0}")]
    StoreError(String),
}

impl From<Error> for IntakeServiceError {
    fn from(err: Error) -> Self {
        match err {
            Error::IncidentNotFound(id) => IntakeServiceError::NotFound(id),
            Error::InvalidStatus(_) | Error::InvalidCoordinates { .. } => {
                IntakeServiceError::InvalidInput(err.to_string())
            }
            Error::Json(e) => IntakeServiceError::InvalidPayload(e.to_string()),
            _ => IntakeServiceError::StoreError(err.to_string()),
        }
    }
}

/// Where the vehicle registration comes from
#[derive(Debug, Clone)]
pub enum RegistrationSource {
    /// Raw OCR text of the registration card
    OcrText(String),
    /// Fields already extracted elsewhere
    Parsed(RegistrationInfo),
}

/// Everything submitted for one incident
#[derive(Debug, Clone, Default)]
pub struct IntakeRequest {
    pub bundle: AnnotationBundle,
    pub context_hint: Option<String>,
    pub registration: Option<RegistrationSource>,
    /// (latitude, longitude)
    pub coordinates: Option<(f64, f64)>,
}

impl IntakeRequest {
    pub fn new(bundle: AnnotationBundle) -> Self {
        Self {
            bundle,
            ..Default::default()
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.context_hint = Some(hint.into());
        self
    }

    pub fn with_registration_text(mut self, text: impl Into<String>) -> Self {
        self.registration = Some(RegistrationSource::OcrText(text.into()));
        self
    }

    pub fn with_registration(mut self, info: RegistrationInfo) -> Self {
        self.registration = Some(RegistrationSource::Parsed(info));
        self
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinates = Some((latitude, longitude));
        self
    }
}

/// Document sent to the downstream system for a stored report
pub fn relay_payload(report: &IncidentReport) -> Value {
    json!({
        "incident": report.incident,
        "vehicle": report.vehicle,
        "location": report.location,
        "timestamp": report.timestamp,
        "status": report.status,
    })
}

/// Start of a notification window ending now; negative windows count as zero
pub fn notification_since(window_minutes: i64) -> Result<DateTime<Utc>, IntakeServiceError> {
    Duration::try_minutes(window_minutes.max(0))
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .ok_or_else(|| {
            IntakeServiceError::InvalidInput(format!(
                "notification window out of range: {} min",
                window_minutes
            ))
        })
}

/// Intake use case over an injected incident repository
pub struct IntakeService<R: IncidentRepository> {
    repo: R,
    default_hint: Option<String>,
}

impl<R: IncidentRepository> IntakeService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            default_hint: None,
        }
    }

    /// Hint used for requests that carry none
    pub fn with_default_hint(mut self, hint: Option<String>) -> Self {
        self.default_hint = hint;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Classify, extract and store one incident
    pub fn process(&self, request: IntakeRequest) -> Result<IncidentReport, IntakeServiceError> {
        let hint = request.context_hint.or_else(|| self.default_hint.clone());
        let incident = classify(&request.bundle, hint.as_deref());

        let mut errors = Vec::new();
        if let Some(message) = &incident.error {
            errors.push(message.clone());
        }

        let mut report = IncidentReport::new(incident);

        match request.registration {
            Some(RegistrationSource::OcrText(text)) => {
                let info = extract_registration_info(&text);
                if info.is_empty() {
                    errors.push("No registration fields found in card text".to_string());
                }
                report = report.with_vehicle(info);
            }
            Some(RegistrationSource::Parsed(info)) => report = report.with_vehicle(info),
            None => {}
        }

        if let Some((latitude, longitude)) = request.coordinates {
            match Coordinates::new(latitude, longitude) {
                Ok(coordinates) => {
                    report = report.with_location(LocationInfo::from_coordinates(coordinates))
                }
                Err(e) => {
                    warn!("Dropping location: {}", e);
                    errors.push(e.to_string());
                }
            }
        }

        report.errors = errors;
        self.repo.insert(&report)?;
        info!(
            "Stored incident {} ({})",
            report.id, report.incident.incident_type
        );
        Ok(report)
    }

    /// Store a relayed payload on the receiving side with status `received`
    pub fn receive(&self, payload: &Value) -> Result<IncidentReport, IntakeServiceError> {
        for section in ["incident", "vehicle", "location"] {
            if payload.get(section).is_none() {
                return Err(IntakeServiceError::MissingSection(section));
            }
        }

        let incident: IncidentClassification = serde_json::from_value(payload["incident"].clone())
            .map_err(|e| IntakeServiceError::InvalidPayload(format!("incident: {}", e)))?;
        let vehicle: Option<RegistrationInfo> = serde_json::from_value(payload["vehicle"].clone())
            .map_err(|e| IntakeServiceError::InvalidPayload(format!("vehicle: {}", e)))?;
        let location: Option<LocationInfo> = serde_json::from_value(payload["location"].clone())
            .map_err(|e| IntakeServiceError::InvalidPayload(format!("location: {}", e)))?;

        let mut report = IncidentReport::new(incident).with_status(IncidentStatus::Received);
        report.vehicle = vehicle;
        report.location = location;

        self.repo.insert(&report)?;
        info!("Received incident {}", report.id);
        Ok(report)
    }

    pub fn list(&self) -> Result<Vec<IncidentReport>, IntakeServiceError> {
        Ok(self.repo.list_all()?)
    }

    pub fn get(&self, id: &str) -> Result<IncidentReport, IntakeServiceError> {
        self.repo
            .get_by_id(id)?
            .ok_or_else(|| IntakeServiceError::NotFound(id.to_string()))
    }

    pub fn update_status(
        &self,
        id: &str,
        status: IncidentStatus,
    ) -> Result<IncidentReport, IntakeServiceError> {
        let report = self.repo.update_status(id, status)?;
        info!("Incident {} updated to status: {}", id, status);
        Ok(report)
    }

    /// Status changes within the last `window_minutes`
    pub fn notifications(
        &self,
        window_minutes: i64,
    ) -> Result<Vec<StatusNotification>, IntakeServiceError> {
        let since = notification_since(window_minutes)?;
        Ok(self.repo.recent_notifications(since)?)
    }
}
