//! Vision module - converts annotation service output into annotation bundles

pub mod response;

use std::path::Path;

use log::{debug, info};
use serde_json::Value;

use intake_types::{AnnotationBundle, Error, Result};
use response::{AnnotateResponse, BatchResponse};

/// Top-level keys that mark a vendor response rather than a plain bundle
const VENDOR_KEYS: &[&str] = &[
    "responses",
    "labelAnnotations",
    "localizedObjectAnnotations",
    "textAnnotations",
    "imagePropertiesAnnotation",
    "error",
];

/// Parse a vendor annotate-image response (single or `responses` batch)
pub fn parse_annotate_response(json: &str) -> Result<AnnotationBundle> {
    let value: Value = serde_json::from_str(&extract_json_from_response(json))?;
    from_vendor_value(value)
}

fn from_vendor_value(value: Value) -> Result<AnnotationBundle> {
    let response = if value.get("responses").is_some() {
        let batch: BatchResponse = serde_json::from_value(value)?;
        batch.responses.into_iter().next().unwrap_or_default()
    } else {
        serde_json::from_value::<AnnotateResponse>(value)?
    };

    if let Some(status) = &response.error {
        return Err(Error::Vendor(status.message.clone()));
    }

    info!(
        "Annotations: {} labels, {} objects, {} text blocks",
        response.label_annotations.len(),
        response.localized_object_annotations.len(),
        response.text_annotations.len()
    );
    Ok(response.into())
}

fn is_vendor_shape(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| VENDOR_KEYS.iter().any(|k| obj.contains_key(*k)))
}

/// Parse either a plain annotation bundle or a vendor response
pub fn parse_bundle(json: &str) -> Result<AnnotationBundle> {
    let value: Value = serde_json::from_str(&extract_json_from_response(json))?;
    if is_vendor_shape(&value) {
        debug!("Detected vendor response shape");
        from_vendor_value(value)
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

/// Load an annotation bundle file, detecting its shape
pub fn load_bundle(path: &Path) -> Result<AnnotationBundle> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    parse_bundle(&content)
}

/// Extract JSON from a response that may be wrapped in markdown code blocks
/// or surrounded by prose
pub fn extract_json_from_response(response: &str) -> String {
    let response = response.trim();

    if response.starts_with("```") {
        if let Some(end) = response.rfind("```") {
            let start = response.find('\n').map_or(response.len(), |i| i + 1);
            if start < end {
                return response[start..end].trim().to_string();
            }
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if start < end {
                return response[start..=end].to_string();
            }
        }
    }

    response.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VENDOR: &str = r#"{
        "labelAnnotations": [
            {"description": "Flat tire", "score": 0.91},
            {"description": "Automotive tire", "score": 0.88}
        ],
        "localizedObjectAnnotations": [{"name": "Wheel", "score": 0.8}],
        "textAnnotations": [
            {"description": "PLACA ABC123\nTOYOTA"},
            {"description": "PLACA"}
        ],
        "imagePropertiesAnnotation": {
            "dominantColors": {"colors": [
                {"color": {"red": 20, "green": 20}, "score": 0.4, "pixelFraction": 0.1}
            ]}
        }
    }"#;

    #[test]
    fn test_parse_vendor_response() {
        let bundle = parse_annotate_response(VENDOR).unwrap();
        assert_eq!(bundle.labels.len(), 2);
        assert_eq!(bundle.labels[0].text, "Flat tire");
        assert_eq!(bundle.objects[0].name, "Wheel");
        assert_eq!(bundle.text_lines, vec!["PLACA ABC123", "TOYOTA"]);
        let color = &bundle.dominant_colors[0];
        assert_eq!((color.red, color.green, color.blue), (20.0, 20.0, 0.0));
        assert_eq!(color.weight, 0.4);
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let bundle = parse_annotate_response(r#"{"labelAnnotations": []}"#).unwrap();
        assert!(bundle.is_empty());
    }

    #[test]
    fn test_batch_envelope_uses_first_response() {
        let json = r#"{"responses": [
            {"labelAnnotations": [{"description": "Car", "score": 0.9}]},
            {"labelAnnotations": [{"description": "Truck", "score": 0.9}]}
        ]}"#;
        let bundle = parse_annotate_response(json).unwrap();
        assert_eq!(bundle.labels.len(), 1);
        assert_eq!(bundle.labels[0].text, "Car");

        let empty = parse_annotate_response(r#"{"responses": []}"#).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_vendor_error() {
        let json = r#"{"responses": [{"error": {"code": 7, "message": "quota exceeded"}}]}"#;
        match parse_annotate_response(json) {
            Err(Error::Vendor(msg)) => assert_eq!(msg, "quota exceeded"),
            other => panic!("expected vendor error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bundle_detects_plain_shape() {
        let json = r#"{"labels": [{"text": "Car", "confidence": 0.5}], "textLines": null}"#;
        let bundle = parse_bundle(json).unwrap();
        assert_eq!(bundle.labels[0].text, "Car");
        assert!(bundle.text_lines.is_empty());

        let vendor = parse_bundle(VENDOR).unwrap();
        assert_eq!(vendor.objects.len(), 1);
    }

    #[test]
    fn test_load_bundle_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "```json\n{}\n```", VENDOR).unwrap();
        let bundle = load_bundle(file.path()).unwrap();
        assert_eq!(bundle.labels.len(), 2);
    }

    #[test]
    fn test_load_bundle_missing_file() {
        let result = load_bundle(Path::new("/nonexistent/bundle.json"));
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_extract_json_from_response() {
        assert_eq!(
            extract_json_from_response("```json\n{\"a\": 1}\n```"),
            "{\"a\": 1}"
        );
        assert_eq!(
            extract_json_from_response("Here you go: {\"a\": 1} done"),
            "{\"a\": 1}"
        );
        assert_eq!(extract_json_from_response("plain"), "plain");
    }
}
