use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use super::domain::{PaymentTrackingMessage, TransactionStatus};
use super::notification::{EmailDispatcher, EmailMessage, EmailType};
use super::queue::{PaymentQueue, QueueRecord};
use crate::workflows::registrations::domain::Registration;
use crate::workflows::registrations::repository::RegistrationRepository;

/// Batch consumer for payment tracking messages.
///
/// Records are processed sequentially and independently: one record's failure
/// never aborts its siblings, and every record is acknowledged exactly once
/// regardless of outcome, because by then the message has either produced a
/// user-visible side effect or is unrecoverable garbage.
pub struct PaymentConfirmationPipeline<Q, D, R> {
    queue: Arc<Q>,
    dispatcher: Arc<D>,
    registrations: Arc<R>,
}

/// Failure terminal for a single record. No retries happen inside the
/// pipeline; crash recovery relies solely on the queue's
/// redelivery-before-ack window.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid payment tracking payload: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Dispatch(#[from] super::notification::DispatchError),
    #[error("failed to save registration: {0}")]
    Persistence(#[from] crate::store::StoreError),
}

/// Per-batch outcome counts for operational logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

impl<Q, D, R> PaymentConfirmationPipeline<Q, D, R>
where
    Q: PaymentQueue + 'static,
    D: EmailDispatcher + 'static,
    R: RegistrationRepository + 'static,
{
    pub fn new(queue: Arc<Q>, dispatcher: Arc<D>, registrations: Arc<R>) -> Self {
        Self {
            queue,
            dispatcher,
            registrations,
        }
    }

    /// Process one delivered batch, acknowledging every record on the way out.
    pub fn process_batch(&self, records: &[QueueRecord]) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for record in records {
            match self.process_record(record) {
                Ok(_) => summary.processed += 1,
                Err(err) => {
                    summary.failed += 1;
                    error!(
                        receipt_handle = %record.receipt_handle,
                        error = %err,
                        "failed to process payment tracking record"
                    );
                }
            }

            // The ack must run no matter how processing ended; an ack failure
            // is logged and the batch moves on.
            if let Err(err) = self.queue.acknowledge(&record.receipt_handle) {
                error!(
                    receipt_handle = %record.receipt_handle,
                    error = %err,
                    "failed to acknowledge payment tracking record"
                );
            }
        }

        summary
    }

    /// Handle one record: parse, notify, and on success persist the
    /// registration. The notification is not rolled back if the write fails.
    fn process_record(&self, record: &QueueRecord) -> Result<Option<Registration>, PipelineError> {
        let message: PaymentTrackingMessage = serde_json::from_str(&record.body)?;
        let status = message.status;
        let submission = &message.registration_details.registration_data;

        self.dispatcher.send(&confirmation_email(&message))?;

        if status != TransactionStatus::Success {
            info!(
                email = %submission.email,
                status = status.label(),
                "payment unsuccessful, no registration recorded"
            );
            return Ok(None);
        }

        let registration =
            Registration::from_confirmed_payment(&message.registration_details, status, Utc::now());
        let stored = self.registrations.insert(registration)?;
        info!(
            email = %stored.email,
            registration_id = %stored.registration_id,
            "saved registration from confirmed payment"
        );

        Ok(Some(stored))
    }
}

/// Pick the outbound email for a payment outcome.
fn confirmation_email(message: &PaymentTrackingMessage) -> EmailMessage {
    let submission = &message.registration_details.registration_data;

    let (subject, body) = match message.status {
        TransactionStatus::Success => (
            "Registration Successful",
            vec![
                "Thank you for registering! We are excited to have you join us for this event."
                    .to_string(),
                "Your payment has been successfully processed. Below are your registration details."
                    .to_string(),
            ],
        ),
        _ => (
            "Payment Unsuccessful",
            vec!["Your payment was not successful. Please try again later.".to_string()],
        ),
    };

    EmailMessage {
        to: vec![submission.email.clone()],
        subject: subject.to_string(),
        salutation: format!("Hi {},", submission.first_name),
        body,
        closing: "Best,".to_string(),
        email_type: EmailType::Registration,
        event_id: message.registration_details.event_id.clone(),
    }
}

#[cfg(test)]
mod email_tests {
    use super::*;
    use crate::workflows::registrations::domain::RegistrationSubmission;

    fn message(status: TransactionStatus) -> PaymentTrackingMessage {
        PaymentTrackingMessage {
            registration_details: crate::workflows::payments::domain::PaymentTransaction {
                event_id: Some("pycon-2025".to_string()),
                registration_data: RegistrationSubmission {
                    email: "ada@example.com".to_string(),
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
                },
                amount_paid: 1500.0,
                transaction_id: "txn-1".to_string(),
                payment_id: "pay-1".to_string(),
                reference_number: "ref-1".to_string(),
                wallet_payment: false,
            },
            status,
        }
    }

    #[test]
    fn success_email_uses_thank_you_copy() {
        let email = confirmation_email(&message(TransactionStatus::Success));
        assert_eq!(email.subject, "Registration Successful");
        assert_eq!(email.salutation, "Hi Ada,");
        assert_eq!(email.to, vec!["ada@example.com".to_string()]);
        assert_eq!(email.event_id.as_deref(), Some("pycon-2025"));
        assert_eq!(email.body.len(), 2);
    }

    #[test]
    fn non_success_email_asks_for_retry() {
        for status in [TransactionStatus::Failed, TransactionStatus::Pending] {
            let email = confirmation_email(&message(status));
            assert_eq!(email.subject, "Payment Unsuccessful");
            assert_eq!(
                email.body,
                vec!["Your payment was not successful. Please try again later.".to_string()]
            );
        }
    }
}
