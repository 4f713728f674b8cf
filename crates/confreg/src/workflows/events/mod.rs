//! Event records, consumed by other workflows as a referential precondition.

pub mod domain;
pub mod repository;

pub use domain::{EventRecord, EventStatus};
pub use repository::EventRepository;
