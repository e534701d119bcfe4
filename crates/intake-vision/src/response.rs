//! Vendor annotate-image response shape

use serde::Deserialize;

use intake_types::{
    null_to_default, AnnotationBundle, DominantColor, LabelAnnotation, ObjectAnnotation,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateResponse {
    #[serde(default, deserialize_with = "null_to_default")]
    pub label_annotations: Vec<VendorLabel>,

    #[serde(default, deserialize_with = "null_to_default")]
    pub localized_object_annotations: Vec<VendorObject>,

    #[serde(default, deserialize_with = "null_to_default")]
    pub text_annotations: Vec<VendorText>,

    #[serde(default)]
    pub image_properties_annotation: Option<ImageProperties>,

    #[serde(default)]
    pub error: Option<VendorStatus>,
}

/// Batch wrapper; only the first response is used
#[derive(Debug, Default, Deserialize)]
pub struct BatchResponse {
    #[serde(default, deserialize_with = "null_to_default")]
    pub responses: Vec<AnnotateResponse>,
}

#[derive(Debug, Deserialize)]
pub struct VendorLabel {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct VendorObject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct VendorText {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProperties {
    #[serde(default)]
    pub dominant_colors: Option<ColorsInfo>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ColorsInfo {
    #[serde(default, deserialize_with = "null_to_default")]
    pub colors: Vec<ColorInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ColorInfo {
    #[serde(default)]
    pub color: Rgb,
    #[serde(default)]
    pub score: f64,
}

/// Zero channels are omitted on the wire
#[derive(Debug, Default, Deserialize)]
pub struct Rgb {
    #[serde(default)]
    pub red: f64,
    #[serde(default)]
    pub green: f64,
    #[serde(default)]
    pub blue: f64,
}

#[derive(Debug, Deserialize)]
pub struct VendorStatus {
    #[serde(default)]
    pub message: String,
}

impl From<AnnotateResponse> for AnnotationBundle {
    fn from(response: AnnotateResponse) -> Self {
        let text_lines = response
            .text_annotations
            .first()
            .map(|t| t.description.split('\n').map(str::to_string).collect())
            .unwrap_or_default();

        let dominant_colors = response
            .image_properties_annotation
            .and_then(|p| p.dominant_colors)
            .map(|d| d.colors)
            .unwrap_or_default()
            .into_iter()
            .map(|c| DominantColor::new(c.color.red, c.color.green, c.color.blue, c.score))
            .collect();

        AnnotationBundle {
            labels: response
                .label_annotations
                .into_iter()
                .map(|l| LabelAnnotation::new(l.description, l.score))
                .collect(),
            objects: response
                .localized_object_annotations
                .into_iter()
                .map(|o| ObjectAnnotation::new(o.name, o.score))
                .collect(),
            text_lines,
            dominant_colors,
        }
    }
}
