use std::sync::Arc;

use chrono::Utc;
use clap::Args;
use serde_json::json;

use crate::infra::{InMemoryEmailDispatcher, InMemoryPaymentQueue};
use confreg::config::AppConfig;
use confreg::error::AppError;
use confreg::store::MemoryStore;
use confreg::workflows::evaluations::{EvaluationDraft, EvaluationPatch, EvaluationService};
use confreg::workflows::events::EventRecord;
use confreg::workflows::payments::{PaymentConfirmationPipeline, QueueRecord};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Event the demo registrations and evaluations belong to
    #[arg(long, default_value = "demo-conf")]
    pub(crate) event_id: String,
    /// Registrant email used in the generated payment messages
    #[arg(long, default_value = "attendee@example.com")]
    pub(crate) email: String,
}

/// Walk one success and one failure payment message through the pipeline,
/// then submit and update evaluations for the resulting registration.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let DemoArgs { event_id, email } = args;

    let store = Arc::new(MemoryStore::new());
    store.seed_event(EventRecord::new(&event_id, "Demo Conference", Utc::now()));

    let queue = Arc::new(InMemoryPaymentQueue::new(config.queue.payment_queue.clone()));
    let dispatcher = Arc::new(InMemoryEmailDispatcher::default());
    let pipeline =
        PaymentConfirmationPipeline::new(queue.clone(), dispatcher.clone(), store.clone());

    let records = vec![
        QueueRecord::new("demo-rh-1", tracking_body(&event_id, &email, "SUCCESS")),
        QueueRecord::new(
            "demo-rh-2",
            tracking_body(&event_id, "declined@example.com", "FAILED"),
        ),
    ];

    println!("== Payment confirmation ==");
    let summary = pipeline.process_batch(&records);
    println!(
        "processed {} record(s), {} failed, {} acknowledged",
        summary.processed,
        summary.failed,
        queue.acknowledged().len()
    );
    for message in dispatcher.sent() {
        println!("  email -> {:?}: {}", message.to, message.subject);
    }

    let registrations = store.all_registrations();
    println!("registrations on file: {}", registrations.len());
    let Some(registration) = registrations.first() else {
        println!("no registration was created; skipping evaluations");
        return Ok(());
    };
    println!(
        "  {} <{}> status {}",
        registration.registration_id,
        registration.email,
        registration.entry_status.label()
    );

    println!();
    println!("== Evaluations ==");
    let service = EvaluationService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        config.audit.actor.clone(),
    );

    let created = service
        .create(
            &event_id,
            &registration.registration_id,
            &[
                EvaluationDraft {
                    question: "overall".to_string(),
                    response: "Loved it".to_string(),
                    rating: Some(5),
                    remarks: None,
                },
                EvaluationDraft {
                    question: "venue".to_string(),
                    response: "Easy to reach".to_string(),
                    rating: Some(4),
                    remarks: None,
                },
            ],
        )?;
    for view in &created {
        println!(
            "  stored {} / {} -> {} ({})",
            view.registration_id,
            view.question,
            view.response,
            view.status.label()
        );
    }

    let noop = service
        .update(
            &event_id,
            &registration.registration_id,
            "overall",
            &EvaluationPatch {
                response: Some("Loved it".to_string()),
                ..EvaluationPatch::default()
            },
        )?;
    println!(
        "  update with identical response wrote nothing: updated = {}",
        noop.updated
    );

    let changed = service
        .update(
            &event_id,
            &registration.registration_id,
            "overall",
            &EvaluationPatch {
                rating: Some(3),
                ..EvaluationPatch::default()
            },
        )?;
    println!(
        "  rating change persisted: updated = {}, updated_by = {}",
        changed.updated, changed.evaluation.updated_by
    );

    let refreshed = store
        .all_registrations()
        .into_iter()
        .find(|entry| entry.registration_id == registration.registration_id);
    if let Some(refreshed) = refreshed {
        println!(
            "  certificate eligible: {}",
            refreshed.certificate_claimed
        );
    }

    Ok(())
}

fn tracking_body(event_id: &str, email: &str, status: &str) -> String {
    json!({
        "registration_details": {
            "event_id": event_id,
            "registration_data": {
                "email": email,
                "first_name": "Demo",
                "last_name": "Attendee",
                "ticket_type": "regular"
            },
            "amount_paid": 1500.0,
            "transaction_id": "demo-txn",
            "payment_id": "demo-pay",
            "reference_number": "demo-ref",
            "wallet_payment": false
        },
        "status": status
    })
    .to_string()
}
