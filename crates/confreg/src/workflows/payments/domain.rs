use serde::{Deserialize, Serialize};

use crate::workflows::registrations::domain::RegistrationSubmission;

/// Terminal outcome reported by the payment provider.
///
/// Anything other than `Success` takes the failure notification path; the
/// distinction between `Failed` and `Pending` only matters to operators
/// reading logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Success,
    Failed,
    Pending,
}

impl TransactionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Pending => "PENDING",
        }
    }
}

/// Payment attempt metadata together with the submission it pays for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    #[serde(default)]
    pub event_id: Option<String>,
    pub registration_data: RegistrationSubmission,
    pub amount_paid: f64,
    pub transaction_id: String,
    pub payment_id: String,
    pub reference_number: String,
    #[serde(default)]
    pub wallet_payment: bool,
}

/// One asynchronous notification of a payment attempt's outcome, as delivered
/// on the queue. Unrecognized fields in the body are ignored, never rejected;
/// the message itself is consumed within a single processing attempt and is
/// never persisted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTrackingMessage {
    pub registration_details: PaymentTransaction,
    pub status: TransactionStatus,
}
