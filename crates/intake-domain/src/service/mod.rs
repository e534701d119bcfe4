//! Domain services

pub mod classifier;
pub mod registration;

pub use classifier::{classify, try_classify, ClassifyError};
pub use registration::extract_registration_info;
