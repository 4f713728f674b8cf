use super::domain::{Registration, RegistrationPatch};
use crate::store::StoreError;

/// Persistence surface for registrations.
///
/// `fetch` resolves by the attendee-facing registration id within an event
/// partition, not by the storage sort key. `apply_patch` refreshes the update
/// stamp and returns the stored row as written.
pub trait RegistrationRepository: Send + Sync {
    fn insert(&self, registration: Registration) -> Result<Registration, StoreError>;
    fn fetch(
        &self,
        event_id: &str,
        registration_id: &str,
    ) -> Result<Option<Registration>, StoreError>;
    fn apply_patch(
        &self,
        registration: &Registration,
        patch: &RegistrationPatch,
    ) -> Result<Registration, StoreError>;
}
