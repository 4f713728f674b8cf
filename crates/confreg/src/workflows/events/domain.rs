use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Preregistration,
    Open,
    Cancelled,
    Closed,
    Completed,
}

impl EventStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Preregistration => "preregistration",
            EventStatus::Open => "open",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Closed => "closed",
            EventStatus::Completed => "completed",
        }
    }
}

/// Stored event row. The registration and evaluation workflows only consult
/// existence; the remaining fields belong to the out-of-scope event CRUD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_id: String,
    pub name: String,
    pub status: EventStatus,
    pub create_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

impl EventRecord {
    pub fn new(event_id: impl Into<String>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            event_id: event_id.into(),
            name: name.into(),
            status: EventStatus::Open,
            create_date: now,
            update_date: now,
        }
    }
}
