//! Evaluation workflow: referential precondition checks, diff-based updates,
//! and the lookup paths over the composite evaluation key.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AuditStamp, Evaluation, EvaluationDiff, EvaluationDraft, EvaluationKey, EvaluationPatch,
    EvaluationStatus, EvaluationView, FieldChange,
};
pub use repository::EvaluationRepository;
pub use router::{evaluation_router, CreateEvaluationsRequest, UpdateEvaluationResponse};
pub use service::{EvaluationError, EvaluationFilter, EvaluationService, EvaluationUpdate};
