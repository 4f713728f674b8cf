use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

use confreg::workflows::payments::{
    DispatchError, EmailDispatcher, EmailMessage, PaymentQueue, QueueError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Queue stand-in for local runs: acknowledgments are logged and recorded
/// instead of hitting a real broker.
pub(crate) struct InMemoryPaymentQueue {
    queue_name: String,
    acknowledged: Mutex<Vec<String>>,
}

impl InMemoryPaymentQueue {
    pub(crate) fn new(queue_name: impl Into<String>) -> Self {
        Self {
            queue_name: queue_name.into(),
            acknowledged: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn acknowledged(&self) -> Vec<String> {
        self.acknowledged
            .lock()
            .expect("queue mutex poisoned")
            .clone()
    }
}

impl PaymentQueue for InMemoryPaymentQueue {
    fn acknowledge(&self, receipt_handle: &str) -> Result<(), QueueError> {
        info!(
            queue = %self.queue_name,
            receipt_handle,
            "removed message from queue"
        );
        self.acknowledged
            .lock()
            .expect("queue mutex poisoned")
            .push(receipt_handle.to_string());
        Ok(())
    }
}

/// Email stand-in for local runs: messages are captured for inspection.
#[derive(Default)]
pub(crate) struct InMemoryEmailDispatcher {
    sent: Mutex<Vec<EmailMessage>>,
}

impl InMemoryEmailDispatcher {
    pub(crate) fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("dispatcher mutex poisoned").clone()
    }
}

impl EmailDispatcher for InMemoryEmailDispatcher {
    fn send(&self, message: &EmailMessage) -> Result<(), DispatchError> {
        info!(
            to = ?message.to,
            subject = %message.subject,
            "dispatched email"
        );
        self.sent
            .lock()
            .expect("dispatcher mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}
