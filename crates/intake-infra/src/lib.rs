//! Infrastructure layer for incident intake

pub mod persistence;
