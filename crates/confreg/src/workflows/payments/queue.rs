/// One delivered queue record: an opaque JSON body plus the redelivery handle
/// consumed when acknowledging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRecord {
    pub receipt_handle: String,
    pub body: String,
}

impl QueueRecord {
    pub fn new(receipt_handle: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            receipt_handle: receipt_handle.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("queue unavailable: {0}")]
    Unavailable(String),
}

/// Acknowledgment surface of the payment tracking queue.
///
/// Receiving is owned by the hosting execution environment, which hands the
/// pipeline a batch of [`QueueRecord`]s; the pipeline only ever acknowledges.
pub trait PaymentQueue: Send + Sync {
    fn acknowledge(&self, receipt_handle: &str) -> Result<(), QueueError>;
}
