use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    AuditStamp, Evaluation, EvaluationDiff, EvaluationDraft, EvaluationKey, EvaluationPatch,
    EvaluationView,
};
use super::repository::EvaluationRepository;
use crate::store::StoreError;
use crate::workflows::events::domain::EventRecord;
use crate::workflows::events::repository::EventRepository;
use crate::workflows::registrations::domain::{Registration, RegistrationPatch};
use crate::workflows::registrations::repository::RegistrationRepository;

/// Orchestrates evaluation reads and writes behind an ordered precondition
/// chain: resolve the event, resolve the registration, then touch the
/// evaluation. The chain short-circuits on the first failing stage and
/// propagates its message verbatim.
pub struct EvaluationService<E, R, V> {
    events: Arc<E>,
    registrations: Arc<R>,
    evaluations: Arc<V>,
    actor: String,
}

/// Caller-visible failures of the evaluation workflow.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("Event with id {0} not found")]
    EventNotFound(String),
    #[error("Registration with id {0} not found")]
    RegistrationNotFound(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Update outcome: the stored row plus whether a write actually happened.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationUpdate {
    pub evaluation: EvaluationView,
    pub updated: bool,
}

/// Optional filters for the list operation.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct EvaluationFilter {
    pub event_id: Option<String>,
    pub registration_id: Option<String>,
    pub question: Option<String>,
}

impl<E, R, V> EvaluationService<E, R, V>
where
    E: EventRepository + 'static,
    R: RegistrationRepository + 'static,
    V: EvaluationRepository + 'static,
{
    pub fn new(events: Arc<E>, registrations: Arc<R>, evaluations: Arc<V>, actor: String) -> Self {
        Self {
            events,
            registrations,
            evaluations,
            actor,
        }
    }

    /// Persist one evaluation entry per draft, then flag the registration as
    /// certificate-eligible.
    ///
    /// The registration patch is best-effort: it is not part of the same
    /// atomic unit as the evaluation writes, and its failure does not undo a
    /// successful creation.
    pub fn create(
        &self,
        event_id: &str,
        registration_id: &str,
        drafts: &[EvaluationDraft],
    ) -> Result<Vec<EvaluationView>, EvaluationError> {
        self.require_event(event_id)?;
        let registration = self.require_registration(event_id, registration_id)?;

        let now = Utc::now();
        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let entry =
                Evaluation::from_draft(event_id, registration_id, draft, &self.actor, now);
            created.push(self.evaluations.insert(entry)?);
        }

        if let Err(err) = self
            .registrations
            .apply_patch(&registration, &RegistrationPatch::certificate_claimed())
        {
            warn!(
                registration_id = %registration.registration_id,
                error = %err,
                "failed to flag registration as certificate eligible"
            );
        }

        info!(
            event_id,
            registration_id,
            entries = created.len(),
            "stored evaluation entries"
        );
        Ok(created.into_iter().map(EvaluationView::from).collect())
    }

    /// Apply a field-level diff to one stored evaluation.
    ///
    /// When no patched field differs from stored state, no write happens and
    /// the stored row comes back with `updated == false`. Otherwise a single
    /// transactional write applies the diff plus a fresh update stamp.
    pub fn update(
        &self,
        event_id: &str,
        registration_id: &str,
        question: &str,
        patch: &EvaluationPatch,
    ) -> Result<EvaluationUpdate, EvaluationError> {
        self.require_event(event_id)?;
        self.require_registration(event_id, registration_id)?;

        let key = EvaluationKey::new(event_id, registration_id, question);
        let current = self.require_evaluation(&key, event_id, registration_id, question)?;

        let diff = EvaluationDiff::between(&current, patch);
        if diff.is_empty() {
            info!(event_id, registration_id, question, "no update");
            return Ok(EvaluationUpdate {
                evaluation: current.into(),
                updated: false,
            });
        }

        let stamp = AuditStamp {
            at: Utc::now(),
            by: self.actor.clone(),
        };
        let refreshed = self.evaluations.update(&key, &diff, &stamp)?;
        info!(event_id, registration_id, question, "updated evaluation");

        Ok(EvaluationUpdate {
            evaluation: refreshed.into(),
            updated: true,
        })
    }

    /// Resolve one evaluation by exact composite key.
    ///
    /// Only the event is validated beforehand; a stored evaluation row
    /// already implies its registration.
    pub fn get(
        &self,
        event_id: &str,
        registration_id: &str,
        question: &str,
    ) -> Result<EvaluationView, EvaluationError> {
        self.require_event(event_id)?;

        let key = EvaluationKey::new(event_id, registration_id, question);
        let evaluation = self.require_evaluation(&key, event_id, registration_id, question)?;
        Ok(evaluation.into())
    }

    /// List evaluations by any combination of filters. An empty result is a
    /// not-found outcome, never an empty success list.
    pub fn list(&self, filter: &EvaluationFilter) -> Result<Vec<EvaluationView>, EvaluationError> {
        if let Some(event_id) = filter.event_id.as_deref() {
            self.require_event(event_id)?;
        }

        let matches = self.evaluations.query(
            filter.event_id.as_deref(),
            filter.registration_id.as_deref(),
            filter.question.as_deref(),
        )?;

        if matches.is_empty() {
            let message = match (
                filter.event_id.as_deref(),
                filter.registration_id.as_deref(),
                filter.question.as_deref(),
            ) {
                (Some(event_id), Some(registration_id), Some(question)) => format!(
                    "Evaluation with id {event_id}, {registration_id}#{question} not found"
                ),
                _ => "No evaluations found".to_string(),
            };
            return Err(EvaluationError::NotFound(message));
        }

        Ok(matches.into_iter().map(EvaluationView::from).collect())
    }

    /// List every registrant's answer to one question across an event, via
    /// the secondary (event, question) lookup path.
    pub fn list_by_question(
        &self,
        event_id: &str,
        question: &str,
    ) -> Result<Vec<EvaluationView>, EvaluationError> {
        self.require_event(event_id)?;

        let matches = self.evaluations.query_by_question(event_id, question)?;
        if matches.is_empty() {
            return Err(EvaluationError::NotFound(format!(
                "No evaluations found for event {event_id} and question {question}"
            )));
        }

        Ok(matches.into_iter().map(EvaluationView::from).collect())
    }

    fn require_event(&self, event_id: &str) -> Result<EventRecord, EvaluationError> {
        self.events
            .fetch(event_id)?
            .ok_or_else(|| EvaluationError::EventNotFound(event_id.to_string()))
    }

    fn require_registration(
        &self,
        event_id: &str,
        registration_id: &str,
    ) -> Result<Registration, EvaluationError> {
        self.registrations
            .fetch(event_id, registration_id)?
            .ok_or_else(|| EvaluationError::RegistrationNotFound(registration_id.to_string()))
    }

    fn require_evaluation(
        &self,
        key: &EvaluationKey,
        event_id: &str,
        registration_id: &str,
        question: &str,
    ) -> Result<Evaluation, EvaluationError> {
        self.evaluations.fetch(key)?.ok_or_else(|| {
            EvaluationError::NotFound(format!(
                "Evaluation with id {event_id}, {registration_id}#{question} not found"
            ))
        })
    }
}
