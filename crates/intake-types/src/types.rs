//! Data model shared by the classifier, the registry and the CLI

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::Error;

/// Deserialize null as default value
pub fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Annotation bundle (input)
// ---------------------------------------------------------------------------

/// Label returned by the annotation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelAnnotation {
    pub text: String,
    /// 0.0 - 1.0
    pub confidence: f64,
}

impl LabelAnnotation {
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Localized object returned by the annotation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectAnnotation {
    pub name: String,
    /// 0.0 - 1.0
    pub confidence: f64,
}

impl ObjectAnnotation {
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// Dominant image color with its prevalence weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    /// 0.0 - 1.0
    pub weight: f64,
}

impl DominantColor {
    pub fn new(red: f64, green: f64, blue: f64, weight: f64) -> Self {
        Self {
            red,
            green,
            blue,
            weight,
        }
    }
}

/// Combined annotation output for one image.
///
/// Every section may be missing in the incoming JSON; missing or null sections
/// are read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationBundle {
    #[serde(default, deserialize_with = "null_to_default")]
    pub labels: Vec<LabelAnnotation>,

    #[serde(default, deserialize_with = "null_to_default")]
    pub objects: Vec<ObjectAnnotation>,

    #[serde(default, deserialize_with = "null_to_default")]
    pub text_lines: Vec<String>,

    #[serde(default, deserialize_with = "null_to_default")]
    pub dominant_colors: Vec<DominantColor>,
}

impl AnnotationBundle {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
            && self.objects.is_empty()
            && self.text_lines.is_empty()
            && self.dominant_colors.is_empty()
    }

    pub fn with_label(mut self, text: &str, confidence: f64) -> Self {
        self.labels.push(LabelAnnotation::new(text, confidence));
        self
    }

    pub fn with_object(mut self, name: &str, confidence: f64) -> Self {
        self.objects.push(ObjectAnnotation::new(name, confidence));
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text_lines.extend(text.split('\n').map(str::to_string));
        self
    }

    pub fn with_color(mut self, red: f64, green: f64, blue: f64, weight: f64) -> Self {
        self.dominant_colors
            .push(DominantColor::new(red, green, blue, weight));
        self
    }
}

// ---------------------------------------------------------------------------
// Classification (output)
// ---------------------------------------------------------------------------

/// Incident taxonomy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentType {
    #[serde(rename = "vehicle collision")]
    Collision,
    #[serde(rename = "mechanical failure - battery")]
    Battery,
    #[serde(rename = "mechanical failure - flat tire")]
    FlatTire,
    #[serde(rename = "mechanical failure - tire problem")]
    TireProblem,
    #[serde(rename = "mechanical failure - fluid leak")]
    FluidLeak,
    #[serde(rename = "mechanical failure - dashboard")]
    Dashboard,
    #[serde(rename = "mechanical failure - engine")]
    Engine,
    #[serde(rename = "mechanical failure - oil")]
    Oil,
    #[serde(rename = "mechanical failure - temperature")]
    Temperature,
    #[serde(rename = "mechanical failure - fuel")]
    Fuel,
    #[serde(rename = "access problem - keys forgotten")]
    KeysForgotten,
    #[serde(rename = "access problem - vehicle locked")]
    VehicleLocked,
    #[serde(rename = "access problem - assistance required")]
    AssistanceRequired,
    #[serde(rename = "access problem - keys")]
    AccessKeys,
    #[serde(rename = "access problem - lock")]
    AccessLock,
    #[serde(rename = "access problem - door")]
    AccessDoor,
    #[default]
    #[serde(rename = "undetermined")]
    Undetermined,
    #[serde(rename = "error")]
    Error,
}

impl IncidentType {
    pub fn label(&self) -> &'static str {
        match self {
            IncidentType::Collision => "vehicle collision",
            IncidentType::Battery => "mechanical failure - battery",
            IncidentType::FlatTire => "mechanical failure - flat tire",
            IncidentType::TireProblem => "mechanical failure - tire problem",
            IncidentType::FluidLeak => "mechanical failure - fluid leak",
            IncidentType::Dashboard => "mechanical failure - dashboard",
            IncidentType::Engine => "mechanical failure - engine",
            IncidentType::Oil => "mechanical failure - oil",
            IncidentType::Temperature => "mechanical failure - temperature",
            IncidentType::Fuel => "mechanical failure - fuel",
            IncidentType::KeysForgotten => "access problem - keys forgotten",
            IncidentType::VehicleLocked => "access problem - vehicle locked",
            IncidentType::AssistanceRequired => "access problem - assistance required",
            IncidentType::AccessKeys => "access problem - keys",
            IncidentType::AccessLock => "access problem - lock",
            IncidentType::AccessDoor => "access problem - door",
            IncidentType::Undetermined => "undetermined",
            IncidentType::Error => "error",
        }
    }

    pub fn is_access(&self) -> bool {
        matches!(
            self,
            IncidentType::KeysForgotten
                | IncidentType::VehicleLocked
                | IncidentType::AssistanceRequired
                | IncidentType::AccessKeys
                | IncidentType::AccessLock
                | IncidentType::AccessDoor
        )
    }

    /// True for every outcome except `undetermined` and `error`
    pub fn is_classified(&self) -> bool {
        !matches!(self, IncidentType::Undetermined | IncidentType::Error)
    }

    /// Severity pinned by incident type, overriding the part-count estimate
    pub fn fixed_severity(&self) -> Option<Severity> {
        match self {
            IncidentType::Battery
            | IncidentType::FlatTire
            | IncidentType::TireProblem
            | IncidentType::FluidLeak => Some(Severity::Moderate),
            t if t.is_access() => Some(Severity::Light),
            _ => None,
        }
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Damage severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Light,
    Moderate,
    Severe,
    Critical,
    #[default]
    Undetermined,
}

impl Severity {
    /// Estimate from the number of implicated parts
    pub fn from_part_count(count: usize) -> Self {
        match count {
            0 => Severity::Undetermined,
            1 => Severity::Light,
            2 => Severity::Moderate,
            _ => Severity::Severe,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Light => "light",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
            Severity::Critical => "critical",
            Severity::Undetermined => "undetermined",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Insertion-ordered set of damaged part names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct DamagedParts(Vec<String>);

impl DamagedParts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a part; returns false if it was already present
    pub fn insert(&mut self, part: impl Into<String>) -> bool {
        let part = part.into();
        if self.0.contains(&part) {
            return false;
        }
        self.0.push(part);
        true
    }

    pub fn contains(&self, part: &str) -> bool {
        self.0.iter().any(|p| p == part)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for DamagedParts {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut parts = DamagedParts::new();
        for part in iter {
            parts.insert(part);
        }
        parts
    }
}

impl<S: Into<String>> Extend<S> for DamagedParts {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for part in iter {
            self.insert(part);
        }
    }
}

impl From<Vec<String>> for DamagedParts {
    fn from(parts: Vec<String>) -> Self {
        parts.into_iter().collect()
    }
}

impl From<DamagedParts> for Vec<String> {
    fn from(parts: DamagedParts) -> Self {
        parts.0
    }
}

/// Label echoed back in a classification (score in percent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoLabel {
    pub description: String,
    pub score: f64,
}

/// Object echoed back in a classification (confidence in percent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoObject {
    pub name: String,
    pub confidence: f64,
}

/// Structured result of classifying one annotation bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentClassification {
    pub incident_type: IncidentType,

    pub severity: Severity,

    #[serde(default = "undetermined_vehicle")]
    pub vehicle_type: String,

    #[serde(default)]
    pub damaged_parts: DamagedParts,

    /// 0.0 - 100.0
    #[serde(default)]
    pub confidence_percent: f64,

    /// First labels, score in percent
    #[serde(default)]
    pub labels: Vec<EchoLabel>,

    /// First objects, confidence in percent
    #[serde(default)]
    pub objects: Vec<EchoObject>,

    #[serde(default)]
    pub text_lines: Vec<String>,

    /// Set only on the error outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub const UNDETERMINED_VEHICLE: &str = "undetermined";

fn undetermined_vehicle() -> String {
    UNDETERMINED_VEHICLE.to_string()
}

impl Default for IncidentClassification {
    fn default() -> Self {
        Self {
            incident_type: IncidentType::Undetermined,
            severity: Severity::Undetermined,
            vehicle_type: undetermined_vehicle(),
            damaged_parts: DamagedParts::new(),
            confidence_percent: 0.0,
            labels: Vec::new(),
            objects: Vec::new(),
            text_lines: Vec::new(),
            error: None,
        }
    }
}

impl IncidentClassification {
    /// Error outcome carrying a human-readable message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            incident_type: IncidentType::Error,
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.incident_type == IncidentType::Error
    }
}

// ---------------------------------------------------------------------------
// Registration card
// ---------------------------------------------------------------------------

/// Fields read from a vehicle registration card.
///
/// Serialized with the card's own keys; unmatched fields are `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationInfo {
    #[serde(rename = "placa")]
    pub plate: Option<String>,
    #[serde(rename = "nombre_propietario")]
    pub owner_name: Option<String>,
    #[serde(rename = "marca")]
    pub make: Option<String>,
    #[serde(rename = "modelo")]
    pub model: Option<String>,
    #[serde(rename = "año")]
    pub year: Option<String>,
    #[serde(rename = "color")]
    pub color: Option<String>,
    #[serde(rename = "num_serie")]
    pub vin: Option<String>,
    #[serde(rename = "num_motor")]
    pub engine_number: Option<String>,
    #[serde(rename = "tipo_vehiculo")]
    pub vehicle_class: Option<String>,
    #[serde(rename = "fecha_expedicion")]
    pub issue_date: Option<String>,
    #[serde(rename = "fecha_vencimiento")]
    pub expiry_date: Option<String>,
}

impl RegistrationInfo {
    /// (display label, value) pairs in card order
    pub fn fields(&self) -> [(&'static str, Option<&str>); 11] {
        [
            ("Plate", self.plate.as_deref()),
            ("Owner", self.owner_name.as_deref()),
            ("Make", self.make.as_deref()),
            ("Model", self.model.as_deref()),
            ("Year", self.year.as_deref()),
            ("Color", self.color.as_deref()),
            ("VIN", self.vin.as_deref()),
            ("Engine number", self.engine_number.as_deref()),
            ("Vehicle class", self.vehicle_class.as_deref()),
            ("Issue date", self.issue_date.as_deref()),
            ("Expiry date", self.expiry_date.as_deref()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_none())
    }
}

// ---------------------------------------------------------------------------
// Incident registry
// ---------------------------------------------------------------------------

/// Processing status of a stored incident
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    #[default]
    Pending,
    Received,
    Processing,
    Approved,
    Rejected,
    Completed,
}

impl IncidentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            IncidentStatus::Pending => "pending",
            IncidentStatus::Received => "received",
            IncidentStatus::Processing => "processing",
            IncidentStatus::Approved => "approved",
            IncidentStatus::Rejected => "rejected",
            IncidentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IncidentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(IncidentStatus::Pending),
            "received" => Ok(IncidentStatus::Received),
            "processing" => Ok(IncidentStatus::Processing),
            "approved" => Ok(IncidentStatus::Approved),
            "rejected" => Ok(IncidentStatus::Rejected),
            "completed" => Ok(IncidentStatus::Completed),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// GPS position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Validated constructor; rejects non-finite or out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> crate::Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if valid {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(Error::InvalidCoordinates {
                latitude,
                longitude,
            })
        }
    }
}

/// Where the incident happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub coordinates: Coordinates,
    pub address: String,
    pub city: String,
    pub country: String,
}

pub const LOCATION_UNAVAILABLE: &str = "unavailable";

impl LocationInfo {
    /// Location without reverse geocoding
    pub fn from_coordinates(coordinates: Coordinates) -> Self {
        Self {
            address: format!(
                "Coordinates: {}, {}",
                coordinates.latitude, coordinates.longitude
            ),
            city: LOCATION_UNAVAILABLE.to_string(),
            country: LOCATION_UNAVAILABLE.to_string(),
            coordinates,
        }
    }
}

/// Stored incident record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentReport {
    pub id: String,
    pub incident: IncidentClassification,
    #[serde(default)]
    pub vehicle: Option<RegistrationInfo>,
    #[serde(default)]
    pub location: Option<LocationInfo>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub status: IncidentStatus,
    #[serde(default)]
    pub status_updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl IncidentReport {
    pub fn new(incident: IncidentClassification) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            incident,
            vehicle: None,
            location: None,
            timestamp: Utc::now(),
            status: IncidentStatus::Pending,
            status_updated_at: None,
            errors: Vec::new(),
        }
    }

    pub fn with_vehicle(mut self, vehicle: RegistrationInfo) -> Self {
        self.vehicle = Some(vehicle);
        self
    }

    pub fn with_location(mut self, location: LocationInfo) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_status(mut self, status: IncidentStatus) -> Self {
        self.status = status;
        self
    }
}

/// Status-change notice for an incident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusNotification {
    pub incident_id: String,
    pub status: IncidentStatus,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl StatusNotification {
    pub fn for_report(report: &IncidentReport) -> Option<Self> {
        let timestamp = report.status_updated_at?;
        Some(Self {
            incident_id: report.id.clone(),
            status: report.status,
            timestamp,
            message: format!("Incident {} updated to status: {}", report.id, report.status),
        })
    }
}
