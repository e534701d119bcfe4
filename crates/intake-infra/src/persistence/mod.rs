//! Persistence implementations
//!
//! This module provides file-based implementations of the repository traits.

mod file_incident_repo;

pub use file_incident_repo::{FileIncidentRepository, INCIDENTS_FILE};
