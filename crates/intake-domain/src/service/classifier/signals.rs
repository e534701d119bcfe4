//! Evidence extracted once from an annotation bundle and shared by every rule

use intake_types::{AnnotationBundle, DamagedParts, DominantColor};

use super::hint::{ContextHint, HintCategory};
use super::keywords::*;

/// Near-black, or reddish-brown (transmission fluid) tones
pub fn is_dark(color: &DominantColor) -> bool {
    let (r, g, b) = (color.red, color.green, color.blue);
    (r < 100.0 && g < 100.0 && b < 100.0) || (r > 100.0 && g < 80.0 && b < 80.0)
}

fn average(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

fn best(scores: &[f64]) -> Option<f64> {
    scores.iter().copied().reduce(f64::max)
}

/// Door / key / person cues for the access rule
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessCues {
    pub any: bool,
    pub person: bool,
    pub door: bool,
    pub key: bool,
    pub best_score: f64,
}

impl AccessCues {
    /// At least one of person, door or key specifically detected
    pub fn specific(&self) -> bool {
        self.person || self.door || self.key
    }
}

#[derive(Debug, Clone, Default)]
pub struct Signals {
    pub collision_scores: Vec<f64>,
    pub vehicle_objects: usize,
    pub fluid_scores: Vec<f64>,
    pub dark_weights: Vec<f64>,
    pub fluid_anchor_object: bool,
    pub access: AccessCues,
    pub tire_scores: Vec<f64>,
    pub flat_label: bool,
    pub battery_scores: Vec<f64>,
    /// OCR text, lower-cased, lines joined by '\n'
    pub text: String,
    pub text_lines: Vec<String>,
    pub object_parts: DamagedParts,
    pub vehicle_type: Option<&'static str>,
    pub fluid_hint: bool,
    pub flat_hint: bool,
}

impl Signals {
    pub fn collect(bundle: &AnnotationBundle, hint: Option<&ContextHint>) -> Self {
        let mut s = Signals::default();

        for label in &bundle.labels {
            let text = label.text.to_lowercase();
            let score = label.confidence;

            if contains_any(&text, COLLISION_LABELS) {
                s.collision_scores.push(score);
            }
            if contains_any(&text, FLUID_LABELS) {
                s.fluid_scores.push(score);
            }
            if contains_any(&text, ACCESS_LABELS) {
                s.access.any = true;
                s.access.best_score = s.access.best_score.max(score);
                s.access.person |= text.contains("person");
                s.access.door |= text.contains("door") || text.contains("handle");
                s.access.key |= text.contains("key");
            }
            if contains_any(&text, TIRE_LABELS) {
                s.tire_scores.push(score);
            }
            if contains_any(&text, FLAT_TIRE_LABELS) {
                s.flat_label = true;
            }
            if contains_any(&text, BATTERY_LABELS) {
                s.battery_scores.push(score);
            }
            for (keyword, vehicle) in VEHICLE_TYPES {
                if text.contains(keyword) {
                    s.vehicle_type = Some(*vehicle);
                    break;
                }
            }
        }

        for object in &bundle.objects {
            let name = object.name.to_lowercase();
            let score = object.confidence;

            if VEHICLE_OBJECTS.contains(&name.as_str()) {
                s.vehicle_objects += 1;
            }
            if FLUID_ANCHOR_OBJECTS.contains(&name.as_str()) {
                s.fluid_anchor_object = true;
            }
            if name == "person" {
                s.access.any = true;
                s.access.person = true;
                s.access.best_score = s.access.best_score.max(score);
            }
            if name.contains("door") {
                s.access.any = true;
                s.access.door = true;
                s.access.best_score = s.access.best_score.max(score);
            }
            for (keyword, part) in OBJECT_PARTS {
                if name.contains(keyword) {
                    s.object_parts.insert(*part);
                }
            }
        }

        s.dark_weights = bundle
            .dominant_colors
            .iter()
            .filter(|c| is_dark(c))
            .map(|c| c.weight)
            .collect();

        s.text_lines = bundle.text_lines.clone();
        s.text = bundle.text_lines.join("\n").to_lowercase();

        if let Some(hint) = hint {
            s.fluid_hint = hint.suggests(HintCategory::FluidLeak);
            s.flat_hint = hint.suggests(HintCategory::FlatTire);
        }

        s
    }

    pub fn collision(&self) -> bool {
        !self.collision_scores.is_empty() || self.vehicle_objects >= 2
    }

    /// Dark colors only count when nothing points at a collision
    pub fn dark_colors(&self) -> bool {
        !self.dark_weights.is_empty() && !self.collision() && self.vehicle_objects < 2
    }

    pub fn fluid_signal(&self) -> bool {
        !self.fluid_scores.is_empty() || self.dark_colors()
    }

    /// 0.0 - 1.0; the stronger of label evidence and dark-color prevalence
    pub fn fluid_confidence(&self) -> f64 {
        let labels = average(&self.fluid_scores).unwrap_or(0.0);
        let colors = if self.dark_colors() {
            average(&self.dark_weights).unwrap_or(0.0)
        } else {
            0.0
        };
        labels.max(colors)
    }

    pub fn collision_confidence(&self) -> Option<f64> {
        average(&self.collision_scores)
    }

    pub fn tire_confidence(&self) -> Option<f64> {
        best(&self.tire_scores)
    }

    pub fn battery_confidence(&self) -> Option<f64> {
        average(&self.battery_scores)
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn has_line(&self, line: &str) -> bool {
        self.text_lines.iter().any(|l| l.trim() == line)
    }
}
