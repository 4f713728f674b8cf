use std::sync::Arc;

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::store::{MemoryStore, StoreError};
use crate::workflows::evaluations::domain::{
    AuditStamp, Evaluation, EvaluationDiff, EvaluationDraft, EvaluationKey,
};
use crate::workflows::evaluations::repository::EvaluationRepository;
use crate::workflows::evaluations::router::evaluation_router;
use crate::workflows::evaluations::service::EvaluationService;
use crate::workflows::events::domain::EventRecord;
use crate::workflows::events::repository::EventRepository;
use crate::workflows::payments::domain::TransactionStatus;
use crate::workflows::registrations::domain::{Registration, RegistrationPatch};
use crate::workflows::registrations::repository::RegistrationRepository;

pub(super) const EVENT: &str = "pycon-2025";
pub(super) const ACTOR: &str = "registration-service";

pub(super) fn registration(registration_id: &str) -> Registration {
    let now = Utc::now();
    Registration {
        event_id: EVENT.to_string(),
        sort_key: format!("sort-{registration_id}"),
        registration_id: registration_id.to_string(),
        email: format!("{registration_id}@example.com"),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        nickname: None,
        pronouns: None,
        contact_number: None,
        organization: None,
        job_title: None,
        ticket_type: "regular".to_string(),
        avail_shirt: false,
        shirt_size: None,
        amount_paid: 1500.0,
        transaction_id: "txn-1".to_string(),
        payment_id: "pay-1".to_string(),
        reference_number: "ref-1".to_string(),
        wallet_payment: false,
        registration_email_sent: true,
        confirmation_email_sent: true,
        certificate_claimed: false,
        entry_status: TransactionStatus::Success,
        create_date: now,
        update_date: now,
    }
}

pub(super) fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.seed_event(EventRecord::new(EVENT, "PyCon", Utc::now()));
    store.seed_registration(registration("reg-1"));
    store.seed_registration(registration("reg-2"));
    store
}

pub(super) fn build_service(
    store: &Arc<MemoryStore>,
) -> EvaluationService<MemoryStore, MemoryStore, MemoryStore> {
    EvaluationService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        ACTOR.to_string(),
    )
}

pub(super) fn draft(question: &str, response: &str) -> EvaluationDraft {
    EvaluationDraft {
        question: question.to_string(),
        response: response.to_string(),
        rating: None,
        remarks: None,
    }
}

pub(super) fn evaluation_router_with_store(store: &Arc<MemoryStore>) -> axum::Router {
    evaluation_router(Arc::new(build_service(store)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Every repository call fails with a connection error.
pub(super) struct UnavailableStore;

impl EventRepository for UnavailableStore {
    fn fetch(&self, _event_id: &str) -> Result<Option<EventRecord>, StoreError> {
        Err(StoreError::Connection("store offline".to_string()))
    }
}

impl RegistrationRepository for UnavailableStore {
    fn insert(&self, _registration: Registration) -> Result<Registration, StoreError> {
        Err(StoreError::Connection("store offline".to_string()))
    }

    fn fetch(
        &self,
        _event_id: &str,
        _registration_id: &str,
    ) -> Result<Option<Registration>, StoreError> {
        Err(StoreError::Connection("store offline".to_string()))
    }

    fn apply_patch(
        &self,
        _registration: &Registration,
        _patch: &RegistrationPatch,
    ) -> Result<Registration, StoreError> {
        Err(StoreError::Connection("store offline".to_string()))
    }
}

impl EvaluationRepository for UnavailableStore {
    fn insert(&self, _evaluation: Evaluation) -> Result<Evaluation, StoreError> {
        Err(StoreError::Connection("store offline".to_string()))
    }

    fn fetch(&self, _key: &EvaluationKey) -> Result<Option<Evaluation>, StoreError> {
        Err(StoreError::Connection("store offline".to_string()))
    }

    fn query(
        &self,
        _event_id: Option<&str>,
        _registration_id: Option<&str>,
        _question: Option<&str>,
    ) -> Result<Vec<Evaluation>, StoreError> {
        Err(StoreError::Connection("store offline".to_string()))
    }

    fn query_by_question(
        &self,
        _event_id: &str,
        _question: &str,
    ) -> Result<Vec<Evaluation>, StoreError> {
        Err(StoreError::Connection("store offline".to_string()))
    }

    fn update(
        &self,
        _key: &EvaluationKey,
        _diff: &EvaluationDiff,
        _stamp: &AuditStamp,
    ) -> Result<Evaluation, StoreError> {
        Err(StoreError::Connection("store offline".to_string()))
    }
}
