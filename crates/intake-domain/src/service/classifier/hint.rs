//! Caller-supplied context hint.
//!
//! A hint such as an upload name ("battery_warning", "choque_frontal") forces a
//! fixed outcome when it points at exactly one category. Used for demos and
//! deterministic tests; production callers normally pass `None`.

use intake_types::{DamagedParts, IncidentType, Severity};

use super::keywords::{contains_any, parts};
use super::Verdict;

const BATTERY: &[&str] = &["battery", "bateria", "batería"];
const COLLISION: &[&str] = &[
    "collision",
    "crash",
    "accident",
    "colision",
    "colisión",
    "accidente",
    "choque",
];
const FLAT_TIRE: &[&str] = &["flat", "puncture", "pinchazo"];
const FLUID_LEAK: &[&str] = &["leak", "fluid", "oil", "fuga", "aceite", "liquido", "líquido"];
const ACCESS: &[&str] = &["key", "lock", "door", "access", "llave", "puerta", "acceso"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintCategory {
    Battery,
    Collision,
    FlatTire,
    FluidLeak,
    Access,
}

impl HintCategory {
    const ALL: [HintCategory; 5] = [
        HintCategory::Battery,
        HintCategory::Collision,
        HintCategory::FlatTire,
        HintCategory::FluidLeak,
        HintCategory::Access,
    ];

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            HintCategory::Battery => BATTERY,
            HintCategory::Collision => COLLISION,
            HintCategory::FlatTire => FLAT_TIRE,
            HintCategory::FluidLeak => FLUID_LEAK,
            HintCategory::Access => ACCESS,
        }
    }

    /// Fixed outcome for a forced category
    pub fn verdict(&self) -> Verdict {
        let (incident_type, severity, part_names, confidence): (_, _, &[&str], _) = match self {
            HintCategory::Battery => (
                IncidentType::Battery,
                Severity::Moderate,
                parts::BATTERY_FAILURE,
                90.0,
            ),
            HintCategory::Collision => (
                IncidentType::Collision,
                Severity::Severe,
                parts::COLLISION,
                95.0,
            ),
            HintCategory::FlatTire => (
                IncidentType::FlatTire,
                Severity::Moderate,
                parts::TIRE_FAILURE,
                95.0,
            ),
            HintCategory::FluidLeak => (
                IncidentType::FluidLeak,
                Severity::Moderate,
                parts::FLUID_LEAK,
                93.26,
            ),
            HintCategory::Access => (
                IncidentType::KeysForgotten,
                Severity::Light,
                parts::ACCESS,
                85.0,
            ),
        };
        Verdict {
            incident_type,
            severity: Some(severity),
            damaged_parts: part_names.iter().copied().collect::<DamagedParts>(),
            confidence_percent: confidence,
        }
    }
}

/// Categories a hint string points at
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextHint {
    categories: Vec<HintCategory>,
}

impl ContextHint {
    pub fn parse(hint: &str) -> Self {
        let hint = hint.to_lowercase();
        let categories = HintCategory::ALL
            .into_iter()
            .filter(|c| contains_any(&hint, c.keywords()))
            .collect();
        Self { categories }
    }

    /// The single category matched, if the hint is unambiguous
    pub fn unambiguous(&self) -> Option<HintCategory> {
        match self.categories.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    pub fn suggests(&self, category: HintCategory) -> bool {
        self.categories.contains(&category)
    }
}
