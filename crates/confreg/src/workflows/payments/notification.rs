use serde::{Deserialize, Serialize};

/// Category tag carried on every outbound message so downstream templating can
/// pick a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailType {
    Registration,
    Confirmation,
}

/// Structured outbound notification handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub salutation: String,
    pub body: Vec<String>,
    pub closing: String,
    pub email_type: EmailType,
    pub event_id: Option<String>,
}

/// Transport failure raised by a dispatcher implementation.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("email transport unavailable: {0}")]
    Transport(String),
}

/// Outbound notification hook (e.g. an SES adapter). Fails loudly on
/// transport problems; callers decide whether that aborts their unit of work.
pub trait EmailDispatcher: Send + Sync {
    fn send(&self, message: &EmailMessage) -> Result<(), DispatchError>;
}
