use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::store::{MemoryStore, StoreError};
use crate::workflows::payments::notification::{DispatchError, EmailDispatcher, EmailMessage};
use crate::workflows::payments::pipeline::PaymentConfirmationPipeline;
use crate::workflows::payments::queue::{PaymentQueue, QueueError, QueueRecord};
use crate::workflows::registrations::domain::{Registration, RegistrationPatch};
use crate::workflows::registrations::repository::RegistrationRepository;

pub(super) fn tracking_body(status: &str, email: &str) -> String {
    json!({
        "registration_details": {
            "event_id": "pycon-2025",
            "registration_data": {
                "email": email,
                "first_name": "Ada",
                "last_name": "Lovelace",
                "ticket_type": "regular"
            },
            "amount_paid": 1500.0,
            "transaction_id": "txn-1",
            "payment_id": "pay-1",
            "reference_number": "ref-1",
            "wallet_payment": true
        },
        "status": status
    })
    .to_string()
}

pub(super) fn record(handle: &str, body: String) -> QueueRecord {
    QueueRecord::new(handle, body)
}

pub(super) fn build_pipeline() -> (
    PaymentConfirmationPipeline<RecordingQueue, RecordingDispatcher, MemoryStore>,
    Arc<RecordingQueue>,
    Arc<RecordingDispatcher>,
    Arc<MemoryStore>,
) {
    let queue = Arc::new(RecordingQueue::default());
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let store = Arc::new(MemoryStore::new());
    let pipeline =
        PaymentConfirmationPipeline::new(queue.clone(), dispatcher.clone(), store.clone());
    (pipeline, queue, dispatcher, store)
}

#[derive(Default)]
pub(super) struct RecordingQueue {
    acknowledged: Mutex<Vec<String>>,
}

impl RecordingQueue {
    pub(super) fn acknowledged(&self) -> Vec<String> {
        self.acknowledged
            .lock()
            .expect("queue mutex poisoned")
            .clone()
    }
}

impl PaymentQueue for RecordingQueue {
    fn acknowledge(&self, receipt_handle: &str) -> Result<(), QueueError> {
        self.acknowledged
            .lock()
            .expect("queue mutex poisoned")
            .push(receipt_handle.to_string());
        Ok(())
    }
}

pub(super) struct FailingQueue;

impl PaymentQueue for FailingQueue {
    fn acknowledge(&self, _receipt_handle: &str) -> Result<(), QueueError> {
        Err(QueueError::Unavailable("queue offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct RecordingDispatcher {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingDispatcher {
    pub(super) fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("dispatcher mutex poisoned").clone()
    }
}

impl EmailDispatcher for RecordingDispatcher {
    fn send(&self, message: &EmailMessage) -> Result<(), DispatchError> {
        self.sent
            .lock()
            .expect("dispatcher mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}

pub(super) struct FailingDispatcher;

impl EmailDispatcher for FailingDispatcher {
    fn send(&self, _message: &EmailMessage) -> Result<(), DispatchError> {
        Err(DispatchError::Transport("smtp offline".to_string()))
    }
}

/// Registration writes always fail; used to exercise the
/// notification-already-sent persistence failure path.
pub(super) struct UnavailableRegistrations;

impl RegistrationRepository for UnavailableRegistrations {
    fn insert(&self, _registration: Registration) -> Result<Registration, StoreError> {
        Err(StoreError::Connection("database offline".to_string()))
    }

    fn fetch(
        &self,
        _event_id: &str,
        _registration_id: &str,
    ) -> Result<Option<Registration>, StoreError> {
        Err(StoreError::Connection("database offline".to_string()))
    }

    fn apply_patch(
        &self,
        _registration: &Registration,
        _patch: &RegistrationPatch,
    ) -> Result<Registration, StoreError> {
        Err(StoreError::Connection("database offline".to_string()))
    }
}
