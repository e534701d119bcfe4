//! Ordered classification rules.
//!
//! Evaluated top to bottom, first match wins. Each rule reads only the
//! precomputed [`Signals`], so every entry can be exercised on its own.

use intake_types::{DamagedParts, IncidentType, Severity};

use super::keywords::{
    contains_any, parts, parts_for, BATTERY_TEXT, BATTERY_WARNING_LINE, DASHBOARD_TEXT,
    TEXT_KEYWORDS,
};
use super::signals::Signals;
use super::{round2, Verdict};

pub type Rule = fn(&Signals) -> Option<Verdict>;

pub const RULES: &[(&str, Rule)] = &[
    ("collision", collision),
    ("anchored fluid leak", anchored_fluid_leak),
    ("access problem", access_problem),
    ("tire", tire),
    ("battery", battery),
    ("dashboard text", dashboard_text),
    ("text keyword scan", text_keywords),
];

/// First matching rule, with its name
pub fn evaluate(signals: &Signals) -> Option<(&'static str, Verdict)> {
    RULES
        .iter()
        .find_map(|(name, rule)| rule(signals).map(|verdict| (*name, verdict)))
}

fn fixed(
    incident_type: IncidentType,
    severity: Severity,
    part_names: &[&str],
    confidence_percent: f64,
) -> Verdict {
    Verdict {
        incident_type,
        severity: Some(severity),
        damaged_parts: part_names.iter().copied().collect(),
        confidence_percent: round2(confidence_percent),
    }
}

pub fn collision(s: &Signals) -> Option<Verdict> {
    if !s.collision() {
        return None;
    }
    let mut confidence = s.collision_confidence().map_or(95.0, |c| c * 100.0);
    if s.vehicle_objects >= 2 {
        confidence = confidence.max(95.0);
    }
    Some(fixed(
        IncidentType::Collision,
        Severity::Severe,
        parts::COLLISION,
        confidence,
    ))
}

pub fn anchored_fluid_leak(s: &Signals) -> Option<Verdict> {
    if !s.fluid_signal() || !(s.fluid_anchor_object || s.fluid_hint) {
        return None;
    }
    Some(fixed(
        IncidentType::FluidLeak,
        Severity::Moderate,
        parts::FLUID_LEAK,
        s.fluid_confidence().max(0.85) * 100.0,
    ))
}

pub fn access_problem(s: &Signals) -> Option<Verdict> {
    let cues = &s.access;
    if !cues.any || !cues.specific() || s.fluid_signal() {
        return None;
    }
    let incident_type = if cues.key && cues.door {
        IncidentType::KeysForgotten
    } else if cues.door && cues.person {
        IncidentType::VehicleLocked
    } else if cues.person {
        IncidentType::AssistanceRequired
    } else {
        IncidentType::KeysForgotten
    };
    Some(fixed(
        incident_type,
        Severity::Light,
        parts::ACCESS,
        cues.best_score.max(0.95) * 100.0,
    ))
}

pub fn tire(s: &Signals) -> Option<Verdict> {
    let confidence = s.tire_confidence()?;
    if s.fluid_signal() || s.access.any {
        return None;
    }
    let incident_type = if s.flat_label || s.flat_hint {
        IncidentType::FlatTire
    } else {
        IncidentType::TireProblem
    };
    Some(fixed(
        incident_type,
        Severity::Moderate,
        parts::TIRE_FAILURE,
        confidence * 100.0,
    ))
}

pub fn battery(s: &Signals) -> Option<Verdict> {
    let confidence = s.battery_confidence()?;
    Some(fixed(
        IncidentType::Battery,
        Severity::Moderate,
        parts::BATTERY_FAILURE,
        confidence * 100.0,
    ))
}

pub fn dashboard_text(s: &Signals) -> Option<Verdict> {
    if !s.has_text() || !contains_any(&s.text, DASHBOARD_TEXT) {
        return None;
    }
    if contains_any(&s.text, BATTERY_TEXT) || s.has_line(BATTERY_WARNING_LINE) {
        return Some(fixed(
            IncidentType::Battery,
            Severity::Moderate,
            parts::BATTERY_FAILURE,
            85.0,
        ));
    }
    Some(fixed(
        IncidentType::Dashboard,
        Severity::Light,
        &[parts::DASHBOARD],
        80.0,
    ))
}

/// Keyword scan over the OCR text. Leaves severity to be derived from the
/// part count, and keeps the parts implicated by detected objects.
pub fn text_keywords(s: &Signals) -> Option<Verdict> {
    if !s.has_text() {
        return None;
    }
    let (_, incident_type) = TEXT_KEYWORDS
        .iter()
        .find(|(keyword, _)| s.text.contains(keyword))?;

    let mut damaged_parts: DamagedParts = s.object_parts.clone();
    damaged_parts.extend(parts_for(*incident_type).iter().copied());

    Some(Verdict {
        incident_type: *incident_type,
        severity: None,
        damaged_parts,
        confidence_percent: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_types::AnnotationBundle;

    fn signals(bundle: &AnnotationBundle) -> Signals {
        Signals::collect(bundle, None)
    }

    #[test]
    fn test_rule_order_is_stable() {
        let names: Vec<_> = RULES.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "collision",
                "anchored fluid leak",
                "access problem",
                "tire",
                "battery",
                "dashboard text",
                "text keyword scan",
            ]
        );
    }

    #[test]
    fn test_collision_averages_matching_labels() {
        let bundle = AnnotationBundle::default()
            .with_label("Traffic collision", 0.8)
            .with_label("Accident", 0.6);
        let verdict = collision(&signals(&bundle)).unwrap();
        assert_eq!(verdict.confidence_percent, 70.0);
        assert_eq!(verdict.severity, Some(Severity::Severe));
    }

    #[test]
    fn test_collision_from_vehicles_only() {
        let bundle = AnnotationBundle::default()
            .with_object("Car", 0.9)
            .with_object("Vehicle", 0.7);
        let verdict = collision(&signals(&bundle)).unwrap();
        assert_eq!(verdict.confidence_percent, 95.0);
        assert_eq!(verdict.damaged_parts.as_slice(), &["body", "bumper", "headlights"]);
    }

    #[test]
    fn test_fluid_leak_needs_anchor() {
        let unanchored = AnnotationBundle::default().with_label("Oil", 0.7);
        assert!(anchored_fluid_leak(&signals(&unanchored)).is_none());

        let anchored = unanchored.clone().with_object("Tire", 0.8);
        let verdict = anchored_fluid_leak(&signals(&anchored)).unwrap();
        assert_eq!(verdict.incident_type, IncidentType::FluidLeak);
        assert_eq!(verdict.confidence_percent, 85.0);

        let hinted = Signals {
            fluid_hint: true,
            ..signals(&unanchored)
        };
        assert!(anchored_fluid_leak(&hinted).is_some());
    }

    #[test]
    fn test_access_sub_classification() {
        let keys = AnnotationBundle::default()
            .with_label("Car key", 0.6)
            .with_label("Vehicle door", 0.7);
        assert_eq!(
            access_problem(&signals(&keys)).unwrap().incident_type,
            IncidentType::KeysForgotten
        );

        let locked = AnnotationBundle::default()
            .with_label("Door", 0.7)
            .with_object("Person", 0.9);
        let verdict = access_problem(&signals(&locked)).unwrap();
        assert_eq!(verdict.incident_type, IncidentType::VehicleLocked);
        assert_eq!(verdict.confidence_percent, 95.0);

        let person = AnnotationBundle::default().with_object("Person", 0.98);
        let verdict = access_problem(&signals(&person)).unwrap();
        assert_eq!(verdict.incident_type, IncidentType::AssistanceRequired);
        assert_eq!(verdict.confidence_percent, 98.0);
    }

    #[test]
    fn test_access_requires_specific_cue() {
        let bundle = AnnotationBundle::default().with_label("Padlock", 0.9);
        assert!(access_problem(&signals(&bundle)).is_none());
    }

    #[test]
    fn test_access_blocked_by_fluid_signal() {
        let bundle = AnnotationBundle::default()
            .with_object("Person", 0.9)
            .with_color(15.0, 15.0, 15.0, 0.5);
        assert!(access_problem(&signals(&bundle)).is_none());
    }

    #[test]
    fn test_tire_problem_without_flat_cue() {
        let bundle = AnnotationBundle::default()
            .with_label("Automotive tire", 0.88)
            .with_label("Tread", 0.7);
        let verdict = tire(&signals(&bundle)).unwrap();
        assert_eq!(verdict.incident_type, IncidentType::TireProblem);
        assert_eq!(verdict.confidence_percent, 88.0);
    }

    #[test]
    fn test_battery_from_labels() {
        let bundle = AnnotationBundle::default()
            .with_label("Car battery", 0.9)
            .with_label("Power source", 0.7);
        let verdict = battery(&signals(&bundle)).unwrap();
        assert_eq!(verdict.incident_type, IncidentType::Battery);
        assert_eq!(verdict.confidence_percent, 80.0);
    }

    #[test]
    fn test_dashboard_text() {
        let dash = AnnotationBundle::default().with_text("MPH\nRPM x1000");
        let verdict = dashboard_text(&signals(&dash)).unwrap();
        assert_eq!(verdict.incident_type, IncidentType::Dashboard);
        assert_eq!(verdict.severity, Some(Severity::Light));

        let warning = AnnotationBundle::default().with_text("MPH\n140\nRPM");
        let verdict = dashboard_text(&signals(&warning)).unwrap();
        assert_eq!(verdict.incident_type, IncidentType::Battery);
        assert_eq!(verdict.confidence_percent, 85.0);
    }

    #[test]
    fn test_text_keywords_declaration_order() {
        let bundle = AnnotationBundle::default().with_text("door lock broken, key inside");
        let verdict = text_keywords(&signals(&bundle)).unwrap();
        assert_eq!(verdict.incident_type, IncidentType::AccessKeys);
        assert_eq!(verdict.severity, None);
        assert_eq!(verdict.damaged_parts.as_slice(), &["access system", "lock"]);
    }

    #[test]
    fn test_empty_bundle_matches_nothing() {
        assert!(evaluate(&signals(&AnnotationBundle::default())).is_none());
    }
}
