//! Vision result normalizer
//!
//! Turns an [`AnnotationBundle`] into an [`IncidentClassification`]:
//!
//! 1. Validate numeric fields (malformed data becomes the `error` outcome)
//! 2. Short-circuit on an unambiguous context hint
//! 3. Run the ordered rule table ([`rules::RULES`]), first match wins
//! 4. Derive severity from damaged parts where no rule fixed it
//! 5. Fall back to fluid-leak evidence, then apply confidence and vehicle defaults

pub mod hint;
pub mod keywords;
pub mod rules;
pub mod signals;

use intake_types::{
    AnnotationBundle, DamagedParts, EchoLabel, EchoObject, IncidentClassification, IncidentType,
    Severity,
};
use log::{debug, warn};
use thiserror::Error;

use hint::ContextHint;
use keywords::parts;
use signals::Signals;

const ECHO_LABELS: usize = 5;
const ECHO_OBJECTS: usize = 3;

/// Confidence assigned to a classification no rule scored
pub const DEFAULT_CONFIDENCE: f64 = 75.0;

/// Floor for the dark-color fluid fallback, in percent
pub const FLUID_FALLBACK_FLOOR: f64 = 85.0;

pub const DEFAULT_VEHICLE: &str = "car";

/// Malformed numeric data in an annotation bundle
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    #[error("label '{text}' has invalid confidence {value}")]
    LabelConfidence { text: String, value: f64 },

    #[error("object '{name}' has invalid confidence {value}")]
    ObjectConfidence { name: String, value: f64 },

    #[error("dominant color #{index} has invalid {field} value {value}")]
    Color {
        index: usize,
        field: &'static str,
        value: f64,
    },
}

/// Outcome of a single rule before defaults are applied
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub incident_type: IncidentType,
    /// `None` leaves severity to the part-count estimate
    pub severity: Option<Severity>,
    pub damaged_parts: DamagedParts,
    pub confidence_percent: f64,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn unit_interval(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

fn validate(bundle: &AnnotationBundle) -> Result<(), ClassifyError> {
    for label in &bundle.labels {
        if !unit_interval(label.confidence) {
            return Err(ClassifyError::LabelConfidence {
                text: label.text.clone(),
                value: label.confidence,
            });
        }
    }
    for object in &bundle.objects {
        if !unit_interval(object.confidence) {
            return Err(ClassifyError::ObjectConfidence {
                name: object.name.clone(),
                value: object.confidence,
            });
        }
    }
    for (index, color) in bundle.dominant_colors.iter().enumerate() {
        let channels = [
            ("red", color.red),
            ("green", color.green),
            ("blue", color.blue),
        ];
        for (field, value) in channels {
            if !value.is_finite() || !(0.0..=255.0).contains(&value) {
                return Err(ClassifyError::Color {
                    index,
                    field,
                    value,
                });
            }
        }
        if !unit_interval(color.weight) {
            return Err(ClassifyError::Color {
                index,
                field: "weight",
                value: color.weight,
            });
        }
    }
    Ok(())
}

/// Classify an annotation bundle. Never fails: malformed input yields the
/// `error` classification with confidence 0.
pub fn classify(bundle: &AnnotationBundle, context_hint: Option<&str>) -> IncidentClassification {
    match try_classify(bundle, context_hint) {
        Ok(classification) => classification,
        Err(e) => {
            warn!("Classification failed: {}", e);
            IncidentClassification::error(format!("Error analyzing annotations: {}", e))
        }
    }
}

/// Fallible form of [`classify`]
pub fn try_classify(
    bundle: &AnnotationBundle,
    context_hint: Option<&str>,
) -> Result<IncidentClassification, ClassifyError> {
    validate(bundle)?;

    let hint = context_hint.map(ContextHint::parse);
    let signals = Signals::collect(bundle, hint.as_ref());
    let mut result = echo(bundle);

    if let Some(category) = hint.as_ref().and_then(ContextHint::unambiguous) {
        debug!("Context hint forces {:?}", category);
        apply(&mut result, category.verdict());
        finish(&mut result, &signals);
        return Ok(result);
    }

    match rules::evaluate(&signals) {
        Some((name, verdict)) => {
            debug!("Rule '{}' matched: {}", name, verdict.incident_type);
            apply(&mut result, verdict);
        }
        None => {
            debug!("No rule matched");
            result.damaged_parts = signals.object_parts.clone();
        }
    }

    if result.severity == Severity::Undetermined && !result.damaged_parts.is_empty() {
        result.severity = Severity::from_part_count(result.damaged_parts.len());
    }
    if let Some(fixed) = result.incident_type.fixed_severity() {
        result.severity = fixed;
    }

    if result.incident_type == IncidentType::Undetermined && signals.fluid_signal() {
        debug!("Falling back to fluid leak from color/label evidence");
        result.incident_type = IncidentType::FluidLeak;
        result.severity = Severity::Moderate;
        result.damaged_parts.extend(parts::FLUID_LEAK.iter().copied());
        result.confidence_percent =
            round2((signals.fluid_confidence() * 100.0).max(FLUID_FALLBACK_FLOOR));
    }

    finish(&mut result, &signals);
    Ok(result)
}

fn echo(bundle: &AnnotationBundle) -> IncidentClassification {
    IncidentClassification {
        labels: bundle
            .labels
            .iter()
            .take(ECHO_LABELS)
            .map(|l| EchoLabel {
                description: l.text.clone(),
                score: round2(l.confidence * 100.0),
            })
            .collect(),
        objects: bundle
            .objects
            .iter()
            .take(ECHO_OBJECTS)
            .map(|o| EchoObject {
                name: o.name.clone(),
                confidence: round2(o.confidence * 100.0),
            })
            .collect(),
        text_lines: bundle.text_lines.clone(),
        ..IncidentClassification::default()
    }
}

fn apply(result: &mut IncidentClassification, verdict: Verdict) {
    result.incident_type = verdict.incident_type;
    if let Some(severity) = verdict.severity {
        result.severity = severity;
    }
    result.damaged_parts = verdict.damaged_parts;
    result.confidence_percent = verdict.confidence_percent;
}

/// Confidence and vehicle-type defaults for classified results
fn finish(result: &mut IncidentClassification, signals: &Signals) {
    if let Some(vehicle) = signals.vehicle_type {
        result.vehicle_type = vehicle.to_string();
    }
    if !result.incident_type.is_classified() {
        return;
    }
    if result.confidence_percent == 0.0 {
        result.confidence_percent = DEFAULT_CONFIDENCE;
    }
    if result.vehicle_type == intake_types::UNDETERMINED_VEHICLE {
        result.vehicle_type = DEFAULT_VEHICLE.to_string();
    }
}
