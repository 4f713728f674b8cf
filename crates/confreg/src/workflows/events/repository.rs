use super::domain::EventRecord;
use crate::store::StoreError;

/// Lookup abstraction over the events table.
pub trait EventRepository: Send + Sync {
    fn fetch(&self, event_id: &str) -> Result<Option<EventRecord>, StoreError>;
}
