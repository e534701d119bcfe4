//! Domain layer for incident intake
//!
//! Pure classification and extraction services over already-fetched
//! annotation data, plus the repository traits the application layer injects.

pub mod repository;
pub mod service;

pub use service::{classify, extract_registration_info};
