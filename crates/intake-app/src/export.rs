//! Batch classification results and their JSON export

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use intake_types::{IncidentClassification, Result};

/// One classified bundle file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<IncidentClassification>,
    /// Load failure; classification errors stay inside `classification`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResults {
    pub entries: Vec<BatchEntry>,
    pub total_processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl BatchResults {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            entries: Vec::new(),
            total_processed: 0,
            successful: 0,
            failed: 0,
            started_at,
            completed_at: started_at,
        }
    }

    pub fn push_classified(&mut self, path: &Path, classification: IncidentClassification) {
        self.total_processed += 1;
        if classification.is_error() {
            self.failed += 1;
        } else {
            self.successful += 1;
        }
        self.entries.push(BatchEntry {
            path: path.display().to_string(),
            classification: Some(classification),
            error: None,
        });
    }

    pub fn push_failed(&mut self, path: &Path, error: String) {
        self.total_processed += 1;
        self.failed += 1;
        self.entries.push(BatchEntry {
            path: path.display().to_string(),
            classification: None,
            error: Some(error),
        });
    }

    pub fn finish(&mut self) {
        self.completed_at = Utc::now();
    }

    /// Count of entries per incident type label
    pub fn type_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for c in self.entries.iter().filter_map(|e| e.classification.as_ref()) {
            *counts.entry(c.incident_type.label()).or_insert(0) += 1;
        }
        counts
    }
}

/// Export batch results to a JSON file
pub fn export_to_json(results: &BatchResults, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), results)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_types::IncidentType;

    #[test]
    fn test_counts_and_export() {
        let mut results = BatchResults::new(Utc::now());
        let collision = IncidentClassification {
            incident_type: IncidentType::Collision,
            ..Default::default()
        };
        results.push_classified(Path::new("a.json"), collision);
        results.push_classified(Path::new("b.json"), IncidentClassification::error("bad"));
        results.push_failed(Path::new("c.json"), "File not found".to_string());
        results.finish();

        assert_eq!(results.total_processed, 3);
        assert_eq!(results.successful, 1);
        assert_eq!(results.failed, 2);
        assert_eq!(results.type_counts().get("vehicle collision"), Some(&1));
        assert_eq!(results.type_counts().get("error"), Some(&1));

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out").join("batch.json");
        export_to_json(&results, &out).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["totalProcessed"], 3);
        assert_eq!(value["entries"][2]["error"], "File not found");
        assert!(value["entries"][0].get("error").is_none());
    }
}
