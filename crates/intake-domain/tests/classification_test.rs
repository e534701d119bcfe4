//! End-to-end classification scenarios over whole annotation bundles

use intake_domain::{classify, extract_registration_info};
use intake_types::{AnnotationBundle, IncidentType, Severity};

fn two_cars() -> AnnotationBundle {
    AnnotationBundle::default()
        .with_object("car", 0.9)
        .with_object("car", 0.85)
}

#[test]
fn two_vehicles_always_classify_as_collision() {
    let noisy = [
        two_cars(),
        two_cars().with_label("Car battery", 0.95),
        two_cars().with_label("Oil spill", 0.9),
        two_cars().with_label("Flat tire", 0.99),
        two_cars().with_object("Person", 0.99),
        two_cars().with_color(10.0, 10.0, 10.0, 0.9),
        two_cars().with_text("CHECK ENGINE"),
    ];
    for bundle in &noisy {
        let result = classify(bundle, None);
        assert_eq!(result.incident_type, IncidentType::Collision, "{:?}", bundle);
        assert_eq!(result.severity, Severity::Severe);
    }
}

#[test]
fn empty_bundle_is_undetermined() {
    let result = classify(&AnnotationBundle::default(), None);
    assert_eq!(result.incident_type, IncidentType::Undetermined);
    assert_eq!(result.severity, Severity::Undetermined);
    assert_eq!(result.confidence_percent, 0.0);
    assert!(result.damaged_parts.is_empty());
    assert_eq!(result.vehicle_type, "undetermined");
}

#[test]
fn empty_bundle_with_dark_color_is_fluid_leak() {
    let bundle = AnnotationBundle::default().with_color(20.0, 20.0, 20.0, 0.9);
    let result = classify(&bundle, None);
    assert_eq!(result.incident_type, IncidentType::FluidLeak);
    assert_eq!(result.severity, Severity::Moderate);
    assert_eq!(result.confidence_percent, 90.0);
    assert_eq!(result.vehicle_type, "car");
}

#[test]
fn light_colors_stay_undetermined() {
    let bundle = AnnotationBundle::default().with_color(220.0, 210.0, 200.0, 0.9);
    let result = classify(&bundle, None);
    assert_eq!(result.incident_type, IncidentType::Undetermined);
}

#[test]
fn flat_tire_label() {
    let bundle = AnnotationBundle::default().with_label("flat tire", 0.9);
    let result = classify(&bundle, None);
    assert_eq!(result.incident_type, IncidentType::FlatTire);
    assert_eq!(
        serde_json::to_value(result.incident_type).unwrap(),
        "mechanical failure - flat tire"
    );
    assert!(result.damaged_parts.contains("tire"));
    assert_eq!(result.confidence_percent, 90.0);
}

#[test]
fn two_vehicle_override_ignores_label_confidence() {
    let bundle = two_cars().with_label("traffic collision", 0.8);
    let result = classify(&bundle, None);
    assert_eq!(result.incident_type, IncidentType::Collision);
    assert_eq!(result.confidence_percent, 95.0);
}

#[test]
fn unambiguous_hint_forces_result() {
    let result = classify(&AnnotationBundle::default(), Some("fuga_aceite.jpg"));
    assert_eq!(result.incident_type, IncidentType::FluidLeak);
    assert_eq!(result.confidence_percent, 93.26);

    // ambiguous hints fall through to the rules
    let result = classify(&AnnotationBundle::default(), Some("battery crash"));
    assert_eq!(result.incident_type, IncidentType::Undetermined);
}

#[test]
fn classification_json_shape() {
    let result = classify(&two_cars(), None);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["incidentType"], "vehicle collision");
    assert_eq!(json["severity"], "severe");
    assert_eq!(json["confidencePercent"], 95.0);
    assert_eq!(json["objects"][0]["name"], "car");
    assert!(json.get("error").is_none());
}

#[test]
fn registration_scenarios() {
    let info = extract_registration_info("Placa: ABC123");
    assert_eq!(info.plate.as_deref(), Some("ABC123"));

    let text = "MARCA: Toyota\nMODELO: Corolla\nAÑO 2020";
    let info = extract_registration_info(text);
    assert_eq!(info.make.as_deref(), Some("Toyota"));
    assert_eq!(info.model.as_deref(), Some("Corolla"));
    assert_eq!(info.year.as_deref(), Some("2020"));
    assert_eq!(extract_registration_info(text), info);
}
