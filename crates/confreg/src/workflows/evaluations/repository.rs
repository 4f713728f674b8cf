use super::domain::{AuditStamp, Evaluation, EvaluationDiff, EvaluationKey};
use crate::store::StoreError;

/// Persistence surface for evaluations.
///
/// `insert` is an upsert by composite key. `query` mirrors the primary-key
/// access paths: partition only, `{registration_id}#` prefix, or exact key;
/// with no event id it degrades to a full scan. `query_by_question` is the
/// secondary-index path over (event, question). `update` is transactional: it
/// applies the diff and stamp atomically against the stored row and returns
/// the refreshed copy, or rejects the write entirely.
pub trait EvaluationRepository: Send + Sync {
    fn insert(&self, evaluation: Evaluation) -> Result<Evaluation, StoreError>;
    fn fetch(&self, key: &EvaluationKey) -> Result<Option<Evaluation>, StoreError>;
    fn query(
        &self,
        event_id: Option<&str>,
        registration_id: Option<&str>,
        question: Option<&str>,
    ) -> Result<Vec<Evaluation>, StoreError>;
    fn query_by_question(
        &self,
        event_id: &str,
        question: &str,
    ) -> Result<Vec<Evaluation>, StoreError>;
    fn update(
        &self,
        key: &EvaluationKey,
        diff: &EvaluationDiff,
        stamp: &AuditStamp,
    ) -> Result<Evaluation, StoreError>;
}
