pub mod intake_service;

pub use intake_service::{
    notification_since, relay_payload, IntakeRequest, IntakeService, IntakeServiceError,
    RegistrationSource,
};
