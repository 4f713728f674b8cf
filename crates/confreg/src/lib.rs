//! Core library for the conference registration back end.
//!
//! The crate is organized around two workflows: the asynchronous payment
//! confirmation pipeline that turns queued payment outcomes into durable
//! registrations, and the evaluation workflow that enforces cross-entity
//! preconditions before touching evaluation records. Persistence and outbound
//! email are consumed through narrow traits so every workflow can be exercised
//! against in-memory collaborators.

pub mod config;
pub mod error;
pub mod store;
pub mod telemetry;
pub mod workflows;
