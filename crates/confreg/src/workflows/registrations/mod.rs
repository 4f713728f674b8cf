//! Registration records and the narrow persistence surface other workflows
//! use to create and patch them.

pub mod domain;
pub mod repository;

pub use domain::{Registration, RegistrationPatch, RegistrationSubmission};
pub use repository::RegistrationRepository;
