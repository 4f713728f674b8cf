//! Payment confirmation: consumes asynchronous payment tracking messages,
//! notifies the registrant, and records a durable registration on success.

pub mod domain;
pub mod notification;
pub mod pipeline;
pub mod queue;

#[cfg(test)]
mod tests;

pub use domain::{PaymentTrackingMessage, PaymentTransaction, TransactionStatus};
pub use notification::{DispatchError, EmailDispatcher, EmailMessage, EmailType};
pub use pipeline::{BatchSummary, PaymentConfirmationPipeline, PipelineError};
pub use queue::{PaymentQueue, QueueError, QueueRecord};
