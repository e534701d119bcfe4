//! Repository adapters for persistence layer

use std::path::PathBuf;

use intake_infra::persistence::FileIncidentRepository;
use intake_types::Result;

use crate::config::Config;

/// Open the file-based incident repository in the configured store directory
pub fn open_incident_repo(config: &Config) -> Result<FileIncidentRepository> {
    let store_dir = config.store_dir()?;
    FileIncidentRepository::open(store_dir)
}

/// Open the file-based incident repository at a custom directory
pub fn open_incident_repo_at(store_dir: PathBuf) -> Result<FileIncidentRepository> {
    FileIncidentRepository::open(store_dir)
}
