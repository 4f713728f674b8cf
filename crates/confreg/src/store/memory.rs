use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::Utc;

use super::StoreError;
use crate::workflows::evaluations::domain::{
    registration_prefix, sort_key, AuditStamp, Evaluation, EvaluationDiff, EvaluationKey,
};
use crate::workflows::evaluations::repository::EvaluationRepository;
use crate::workflows::events::domain::EventRecord;
use crate::workflows::events::repository::EventRepository;
use crate::workflows::registrations::domain::{Registration, RegistrationPatch};
use crate::workflows::registrations::repository::RegistrationRepository;

/// Composite-key in-memory tables behind mutexes.
///
/// Backs the binary, the demo, and the test suites. Ordered maps keyed
/// (partition, sort) give the same range/prefix access paths the production
/// table exposes, and the mutex gives the evaluation update its transactional
/// all-or-nothing behavior.
#[derive(Default)]
pub struct MemoryStore {
    events: Mutex<BTreeMap<String, EventRecord>>,
    registrations: Mutex<BTreeMap<(String, String), Registration>>,
    evaluations: Mutex<BTreeMap<(String, String), Evaluation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event row directly, bypassing the out-of-scope event CRUD.
    pub fn seed_event(&self, event: EventRecord) {
        let mut events = self.events.lock().expect("events mutex poisoned");
        events.insert(event.event_id.clone(), event);
    }

    /// Snapshot of every stored registration, in key order.
    pub fn all_registrations(&self) -> Vec<Registration> {
        let registrations = self
            .registrations
            .lock()
            .expect("registrations mutex poisoned");
        registrations.values().cloned().collect()
    }

    /// Insert a registration row directly, for tests and demos that need a
    /// pre-existing attendee.
    pub fn seed_registration(&self, registration: Registration) {
        let mut registrations = self
            .registrations
            .lock()
            .expect("registrations mutex poisoned");
        registrations.insert(
            (
                registration.event_id.clone(),
                registration.sort_key.clone(),
            ),
            registration,
        );
    }
}

impl EventRepository for MemoryStore {
    fn fetch(&self, event_id: &str) -> Result<Option<EventRecord>, StoreError> {
        let events = self.events.lock().expect("events mutex poisoned");
        Ok(events.get(event_id).cloned())
    }
}

impl RegistrationRepository for MemoryStore {
    fn insert(&self, registration: Registration) -> Result<Registration, StoreError> {
        let mut registrations = self
            .registrations
            .lock()
            .expect("registrations mutex poisoned");
        let key = (
            registration.event_id.clone(),
            registration.sort_key.clone(),
        );
        if registrations.contains_key(&key) {
            return Err(StoreError::Conflict);
        }
        registrations.insert(key, registration.clone());
        Ok(registration)
    }

    fn fetch(
        &self,
        event_id: &str,
        registration_id: &str,
    ) -> Result<Option<Registration>, StoreError> {
        let registrations = self
            .registrations
            .lock()
            .expect("registrations mutex poisoned");
        Ok(registrations
            .range((event_id.to_string(), String::new())..)
            .take_while(|((partition, _), _)| partition == event_id)
            .map(|(_, registration)| registration)
            .find(|registration| registration.registration_id == registration_id)
            .cloned())
    }

    fn apply_patch(
        &self,
        registration: &Registration,
        patch: &RegistrationPatch,
    ) -> Result<Registration, StoreError> {
        let mut registrations = self
            .registrations
            .lock()
            .expect("registrations mutex poisoned");
        let key = (
            registration.event_id.clone(),
            registration.sort_key.clone(),
        );
        let stored = registrations.get_mut(&key).ok_or_else(|| {
            StoreError::Write(format!(
                "registration {} is no longer present",
                registration.registration_id
            ))
        })?;

        if let Some(certificate_claimed) = patch.certificate_claimed {
            stored.certificate_claimed = certificate_claimed;
        }
        stored.update_date = Utc::now();

        Ok(stored.clone())
    }
}

impl EvaluationRepository for MemoryStore {
    fn insert(&self, evaluation: Evaluation) -> Result<Evaluation, StoreError> {
        let mut evaluations = self
            .evaluations
            .lock()
            .expect("evaluations mutex poisoned");
        // Writing the same (event, registration, question) triple overwrites.
        evaluations.insert(
            (evaluation.event_id.clone(), evaluation.sort_key.clone()),
            evaluation.clone(),
        );
        Ok(evaluation)
    }

    fn fetch(&self, key: &EvaluationKey) -> Result<Option<Evaluation>, StoreError> {
        let evaluations = self
            .evaluations
            .lock()
            .expect("evaluations mutex poisoned");
        Ok(evaluations
            .get(&(key.event_id.clone(), key.sort_key.clone()))
            .cloned())
    }

    fn query(
        &self,
        event_id: Option<&str>,
        registration_id: Option<&str>,
        question: Option<&str>,
    ) -> Result<Vec<Evaluation>, StoreError> {
        let evaluations = self
            .evaluations
            .lock()
            .expect("evaluations mutex poisoned");

        let Some(event_id) = event_id else {
            // Unfiltered full scan: expensive, last resort.
            return Ok(evaluations.values().cloned().collect());
        };

        let matches: Vec<Evaluation> = evaluations
            .range((event_id.to_string(), String::new())..)
            .take_while(|((partition, _), _)| partition == event_id)
            .filter(|((_, sort), _)| match (registration_id, question) {
                (None, _) => true,
                (Some(registration_id), None) => {
                    sort.starts_with(&registration_prefix(registration_id))
                }
                (Some(registration_id), Some(question)) => {
                    *sort == sort_key(registration_id, question)
                }
            })
            .map(|(_, evaluation)| evaluation.clone())
            .collect();

        Ok(matches)
    }

    fn query_by_question(
        &self,
        event_id: &str,
        question: &str,
    ) -> Result<Vec<Evaluation>, StoreError> {
        let evaluations = self
            .evaluations
            .lock()
            .expect("evaluations mutex poisoned");
        Ok(evaluations
            .range((event_id.to_string(), String::new())..)
            .take_while(|((partition, _), _)| partition == event_id)
            .map(|(_, evaluation)| evaluation)
            .filter(|evaluation| evaluation.question == question)
            .cloned()
            .collect())
    }

    fn update(
        &self,
        key: &EvaluationKey,
        diff: &EvaluationDiff,
        stamp: &AuditStamp,
    ) -> Result<Evaluation, StoreError> {
        let mut evaluations = self
            .evaluations
            .lock()
            .expect("evaluations mutex poisoned");
        let stored = evaluations
            .get_mut(&(key.event_id.clone(), key.sort_key.clone()))
            .ok_or_else(|| {
                StoreError::Write(format!(
                    "evaluation {}/{} is no longer present",
                    key.event_id, key.sort_key
                ))
            })?;

        diff.apply(stored);
        stored.update_date = stamp.at;
        stored.updated_by = stamp.by.clone();

        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::evaluations::domain::{EvaluationDraft, EvaluationPatch};

    fn draft(question: &str) -> EvaluationDraft {
        EvaluationDraft {
            question: question.to_string(),
            response: "Great".to_string(),
            rating: None,
            remarks: None,
        }
    }

    fn seed_evaluations(store: &MemoryStore) {
        let now = Utc::now();
        for (registration_id, question) in
            [("reg-1", "q1"), ("reg-1", "q2"), ("reg-2", "q1")]
        {
            EvaluationRepository::insert(
                store,
                Evaluation::from_draft("pycon-2025", registration_id, &draft(question), "tester", now),
            )
            .expect("insert succeeds");
        }
    }

    #[test]
    fn query_by_prefix_scopes_to_one_registration() {
        let store = MemoryStore::new();
        seed_evaluations(&store);

        let matches = store
            .query(Some("pycon-2025"), Some("reg-1"), None)
            .expect("query succeeds");
        assert_eq!(matches.len(), 2);
        assert!(matches
            .iter()
            .all(|evaluation| evaluation.registration_id == "reg-1"));
    }

    #[test]
    fn query_exact_key_matches_single_row() {
        let store = MemoryStore::new();
        seed_evaluations(&store);

        let matches = store
            .query(Some("pycon-2025"), Some("reg-2"), Some("q1"))
            .expect("query succeeds");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].sort_key, "reg-2#q1");
    }

    #[test]
    fn query_without_event_scans_everything() {
        let store = MemoryStore::new();
        seed_evaluations(&store);

        let matches = store.query(None, None, None).expect("scan succeeds");
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn query_by_question_crosses_registrations() {
        let store = MemoryStore::new();
        seed_evaluations(&store);

        let matches = store
            .query_by_question("pycon-2025", "q1")
            .expect("query succeeds");
        assert_eq!(matches.len(), 2);
        assert!(matches
            .iter()
            .all(|evaluation| evaluation.question == "q1"));
    }

    #[test]
    fn insert_same_triple_overwrites() {
        let store = MemoryStore::new();
        let now = Utc::now();
        EvaluationRepository::insert(
            &store,
            Evaluation::from_draft("pycon-2025", "reg-1", &draft("q1"), "tester", now),
        )
        .expect("first insert");
        EvaluationRepository::insert(
            &store,
            Evaluation::from_draft("pycon-2025", "reg-1", &draft("q1"), "tester", now),
        )
        .expect("second insert overwrites");

        let matches = store
            .query(Some("pycon-2025"), Some("reg-1"), Some("q1"))
            .expect("query succeeds");
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn update_applies_diff_and_stamp_atomically() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let stored = EvaluationRepository::insert(
            &store,
            Evaluation::from_draft("pycon-2025", "reg-1", &draft("q1"), "tester", now),
        )
        .expect("insert succeeds");

        let patch = EvaluationPatch {
            response: Some("Good".to_string()),
            ..EvaluationPatch::default()
        };
        let diff = EvaluationDiff::between(&stored, &patch);
        let stamp = AuditStamp {
            at: Utc::now(),
            by: "editor".to_string(),
        };

        let refreshed = store
            .update(&stored.key(), &diff, &stamp)
            .expect("update succeeds");
        assert_eq!(refreshed.response, "Good");
        assert_eq!(refreshed.updated_by, "editor");
        assert_eq!(refreshed.created_by, "tester");
        assert_eq!(refreshed.update_date, stamp.at);
    }

    #[test]
    fn update_rejects_missing_row() {
        let store = MemoryStore::new();
        let key = EvaluationKey::new("pycon-2025", "reg-1", "q1");
        let result = store.update(&key, &EvaluationDiff::default(), &AuditStamp {
            at: Utc::now(),
            by: "editor".to_string(),
        });
        assert!(matches!(result, Err(StoreError::Write(_))));
    }

    #[test]
    fn registration_fetch_resolves_by_registration_id() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.seed_registration(sample_registration(now));

        let found = RegistrationRepository::fetch(&store, "pycon-2025", "reg-1")
            .expect("fetch succeeds");
        assert!(found.is_some());
        assert!(RegistrationRepository::fetch(&store, "pycon-2025", "reg-9")
            .expect("fetch succeeds")
            .is_none());
    }

    fn sample_registration(now: chrono::DateTime<Utc>) -> Registration {
        Registration {
            event_id: "pycon-2025".to_string(),
            sort_key: "sort-1".to_string(),
            registration_id: "reg-1".to_string(),
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
            amount_paid: 1500.0,
            transaction_id: "txn-1".to_string(),
            payment_id: "pay-1".to_string(),
            reference_number: "ref-1".to_string(),
            wallet_payment: false,
            registration_email_sent: true,
            confirmation_email_sent: true,
            certificate_claimed: false,
            entry_status: crate::workflows::payments::domain::TransactionStatus::Success,
            create_date: now,
            update_date: now,
        }
    }
}
