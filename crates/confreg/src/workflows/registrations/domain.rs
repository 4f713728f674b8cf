use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflows::payments::domain::{PaymentTransaction, TransactionStatus};

/// Attendee-provided data carried inside a payment tracking message before
/// anything is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationSubmission {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub pronouns: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    pub ticket_type: String,
    #[serde(default)]
    pub avail_shirt: bool,
    #[serde(default)]
    pub shirt_size: Option<String>,
}

/// One attendee's confirmed registration.
///
/// Created only by the payment confirmation pipeline after a successful
/// payment; never created speculatively and never deleted by this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    /// Partition key: the event id, or the generated registration id when the
    /// payment message carried no event.
    pub event_id: String,
    /// Sort key, generated at creation time.
    pub sort_key: String,
    pub registration_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub pronouns: Option<String>,
    pub contact_number: Option<String>,
    pub organization: Option<String>,
    pub job_title: Option<String>,
    pub ticket_type: String,
    pub avail_shirt: bool,
    pub shirt_size: Option<String>,
    pub amount_paid: f64,
    pub transaction_id: String,
    pub payment_id: String,
    pub reference_number: String,
    pub wallet_payment: bool,
    pub registration_email_sent: bool,
    pub confirmation_email_sent: bool,
    pub certificate_claimed: bool,
    pub entry_status: TransactionStatus,
    pub create_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

impl Registration {
    /// Assemble a full registration from a confirmed payment.
    ///
    /// Generates the logical registration id and the storage sort key, stamps
    /// both dates with the same instant, and marks both outbound emails as
    /// sent since the confirmation email is dispatched before persistence.
    pub fn from_confirmed_payment(
        details: &PaymentTransaction,
        status: TransactionStatus,
        now: DateTime<Utc>,
    ) -> Self {
        let submission = &details.registration_data;
        let registration_id = Uuid::new_v4().to_string();
        let sort_key = Uuid::new_v4().to_string();
        let event_id = details
            .event_id
            .clone()
            .unwrap_or_else(|| registration_id.clone());

        Self {
            event_id,
            sort_key,
            registration_id,
            email: submission.email.clone(),
            first_name: submission.first_name.clone(),
            last_name: submission.last_name.clone(),
            nickname: submission.nickname.clone(),
            pronouns: submission.pronouns.clone(),
            contact_number: submission.contact_number.clone(),
            organization: submission.organization.clone(),
            job_title: submission.job_title.clone(),
            ticket_type: submission.ticket_type.clone(),
            avail_shirt: submission.avail_shirt,
            shirt_size: submission.shirt_size.clone(),
            amount_paid: details.amount_paid,
            transaction_id: details.transaction_id.clone(),
            payment_id: details.payment_id.clone(),
            reference_number: details.reference_number.clone(),
            wallet_payment: details.wallet_payment,
            registration_email_sent: true,
            confirmation_email_sent: true,
            certificate_claimed: false,
            entry_status: status,
            create_date: now,
            update_date: now,
        }
    }
}

/// Partial update for a stored registration. Fields left `None` are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationPatch {
    #[serde(default)]
    pub certificate_claimed: Option<bool>,
}

impl RegistrationPatch {
    /// Patch issued after a successful evaluation submission.
    pub fn certificate_claimed() -> Self {
        Self {
            certificate_claimed: Some(true),
        }
    }
}
