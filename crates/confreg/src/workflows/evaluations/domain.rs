use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of an evaluation answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStatus {
    Draft,
    Submitted,
}

impl EvaluationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EvaluationStatus::Draft => "draft",
            EvaluationStatus::Submitted => "submitted",
        }
    }
}

/// Composite primary key: partition = event id, sort = `{registration_id}#{question}`.
///
/// Uniqueness of (event, registration, question) falls out of the key scheme;
/// writing the same triple overwrites rather than duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EvaluationKey {
    pub event_id: String,
    pub sort_key: String,
}

impl EvaluationKey {
    pub fn new(event_id: &str, registration_id: &str, question: &str) -> Self {
        Self {
            event_id: event_id.to_string(),
            sort_key: sort_key(registration_id, question),
        }
    }
}

/// Sort key for one registrant's answer to one question.
pub fn sort_key(registration_id: &str, question: &str) -> String {
    format!("{registration_id}#{question}")
}

/// Prefix matching every answer belonging to one registration.
pub fn registration_prefix(registration_id: &str) -> String {
    format!("{registration_id}#")
}

/// One respondent's answer to one question for one registration within one
/// event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub event_id: String,
    pub sort_key: String,
    pub entry_id: String,
    pub registration_id: String,
    pub question: String,
    pub response: String,
    pub rating: Option<u8>,
    pub remarks: Option<String>,
    pub status: EvaluationStatus,
    pub create_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
}

impl Evaluation {
    /// Build a fresh entry from a draft. New entries always start `Draft`
    /// with both stamps and both actors set from the same instant/identity.
    pub fn from_draft(
        event_id: &str,
        registration_id: &str,
        draft: &EvaluationDraft,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: event_id.to_string(),
            sort_key: sort_key(registration_id, &draft.question),
            entry_id: Uuid::new_v4().to_string(),
            registration_id: registration_id.to_string(),
            question: draft.question.clone(),
            response: draft.response.clone(),
            rating: draft.rating,
            remarks: draft.remarks.clone(),
            status: EvaluationStatus::Draft,
            create_date: now,
            update_date: now,
            created_by: actor.to_string(),
            updated_by: actor.to_string(),
        }
    }

    pub fn key(&self) -> EvaluationKey {
        EvaluationKey {
            event_id: self.event_id.clone(),
            sort_key: self.sort_key.clone(),
        }
    }
}

/// Create-time input for a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationDraft {
    pub question: String,
    pub response: String,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Partial update. Fields left `None` are untouched by the diff.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationPatch {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub status: Option<EvaluationStatus>,
}

/// A single field-level change carrying its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Response(String),
    Rating(u8),
    Remarks(String),
    Status(EvaluationStatus),
}

/// Typed field-level diff between a stored evaluation and a patch.
///
/// Built once per update; an empty diff means the write is skipped entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationDiff {
    changes: Vec<FieldChange>,
}

impl EvaluationDiff {
    pub fn between(current: &Evaluation, patch: &EvaluationPatch) -> Self {
        let mut changes = Vec::new();

        if let Some(response) = &patch.response {
            if *response != current.response {
                changes.push(FieldChange::Response(response.clone()));
            }
        }
        if let Some(rating) = patch.rating {
            if Some(rating) != current.rating {
                changes.push(FieldChange::Rating(rating));
            }
        }
        if let Some(remarks) = &patch.remarks {
            if Some(remarks.as_str()) != current.remarks.as_deref() {
                changes.push(FieldChange::Remarks(remarks.clone()));
            }
        }
        if let Some(status) = patch.status {
            if status != current.status {
                changes.push(FieldChange::Status(status));
            }
        }

        Self { changes }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Apply every change through the per-field setter dispatch. Audit stamps
    /// are the transactional update's job, not the diff's.
    pub fn apply(&self, evaluation: &mut Evaluation) {
        for change in &self.changes {
            match change {
                FieldChange::Response(value) => evaluation.response = value.clone(),
                FieldChange::Rating(value) => evaluation.rating = Some(*value),
                FieldChange::Remarks(value) => evaluation.remarks = Some(value.clone()),
                FieldChange::Status(value) => evaluation.status = *value,
            }
        }
    }
}

/// Update-time audit stamp, applied on every transactional write even when
/// only one unrelated business field changed.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditStamp {
    pub at: DateTime<Utc>,
    pub by: String,
}

/// Public representation returned by the workflow operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationView {
    pub entry_id: String,
    pub event_id: String,
    pub registration_id: String,
    pub question: String,
    pub response: String,
    pub rating: Option<u8>,
    pub remarks: Option<String>,
    pub status: EvaluationStatus,
    pub create_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
}

impl From<Evaluation> for EvaluationView {
    fn from(evaluation: Evaluation) -> Self {
        Self {
            entry_id: evaluation.entry_id,
            event_id: evaluation.event_id,
            registration_id: evaluation.registration_id,
            question: evaluation.question,
            response: evaluation.response,
            rating: evaluation.rating,
            remarks: evaluation.remarks,
            status: evaluation.status,
            create_date: evaluation.create_date,
            update_date: evaluation.update_date,
            created_by: evaluation.created_by,
            updated_by: evaluation.updated_by,
        }
    }
}
