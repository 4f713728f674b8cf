use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{EvaluationDraft, EvaluationPatch, EvaluationView};
use super::repository::EvaluationRepository;
use super::service::{EvaluationError, EvaluationFilter, EvaluationService};
use crate::store::StoreError;
use crate::workflows::events::repository::EventRepository;
use crate::workflows::registrations::repository::RegistrationRepository;

/// Router builder exposing the evaluation workflow over HTTP.
pub fn evaluation_router<E, R, V>(service: Arc<EvaluationService<E, R, V>>) -> Router
where
    E: EventRepository + 'static,
    R: RegistrationRepository + 'static,
    V: EvaluationRepository + 'static,
{
    Router::new()
        .route("/api/v1/evaluations", post(create_handler::<E, R, V>))
        .route("/api/v1/evaluations", get(list_handler::<E, R, V>))
        .route(
            "/api/v1/evaluations/:event_id/:registration_id/:question",
            get(get_handler::<E, R, V>).patch(update_handler::<E, R, V>),
        )
        .route(
            "/api/v1/evaluations/:event_id/questions/:question",
            get(list_by_question_handler::<E, R, V>),
        )
        .with_state(service)
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvaluationsRequest {
    pub event_id: String,
    pub registration_id: String,
    pub evaluations: Vec<EvaluationDraft>,
}

#[derive(Debug, Serialize)]
pub struct UpdateEvaluationResponse {
    pub updated: bool,
    pub evaluation: EvaluationView,
}

pub(crate) async fn create_handler<E, R, V>(
    State(service): State<Arc<EvaluationService<E, R, V>>>,
    axum::Json(request): axum::Json<CreateEvaluationsRequest>,
) -> Response
where
    E: EventRepository + 'static,
    R: RegistrationRepository + 'static,
    V: EvaluationRepository + 'static,
{
    match service.create(
        &request.event_id,
        &request.registration_id,
        &request.evaluations,
    ) {
        Ok(created) => (StatusCode::CREATED, axum::Json(created)).into_response(),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn update_handler<E, R, V>(
    State(service): State<Arc<EvaluationService<E, R, V>>>,
    Path((event_id, registration_id, question)): Path<(String, String, String)>,
    axum::Json(patch): axum::Json<EvaluationPatch>,
) -> Response
where
    E: EventRepository + 'static,
    R: RegistrationRepository + 'static,
    V: EvaluationRepository + 'static,
{
    match service.update(&event_id, &registration_id, &question, &patch) {
        Ok(outcome) => (
            StatusCode::OK,
            axum::Json(UpdateEvaluationResponse {
                updated: outcome.updated,
                evaluation: outcome.evaluation,
            }),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn get_handler<E, R, V>(
    State(service): State<Arc<EvaluationService<E, R, V>>>,
    Path((event_id, registration_id, question)): Path<(String, String, String)>,
) -> Response
where
    E: EventRepository + 'static,
    R: RegistrationRepository + 'static,
    V: EvaluationRepository + 'static,
{
    match service.get(&event_id, &registration_id, &question) {
        Ok(evaluation) => (StatusCode::OK, axum::Json(evaluation)).into_response(),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn list_handler<E, R, V>(
    State(service): State<Arc<EvaluationService<E, R, V>>>,
    Query(filter): Query<EvaluationFilter>,
) -> Response
where
    E: EventRepository + 'static,
    R: RegistrationRepository + 'static,
    V: EvaluationRepository + 'static,
{
    match service.list(&filter) {
        Ok(evaluations) => (StatusCode::OK, axum::Json(evaluations)).into_response(),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn list_by_question_handler<E, R, V>(
    State(service): State<Arc<EvaluationService<E, R, V>>>,
    Path((event_id, question)): Path<(String, String)>,
) -> Response
where
    E: EventRepository + 'static,
    R: RegistrationRepository + 'static,
    V: EvaluationRepository + 'static,
{
    match service.list_by_question(&event_id, &question) {
        Ok(evaluations) => (StatusCode::OK, axum::Json(evaluations)).into_response(),
        Err(err) => error_response(&err),
    }
}

/// Map a workflow error to the `{status, message}` shape callers expect.
fn error_response(err: &EvaluationError) -> Response {
    let status = match err {
        EvaluationError::EventNotFound(_)
        | EvaluationError::RegistrationNotFound(_)
        | EvaluationError::NotFound(_) => StatusCode::NOT_FOUND,
        EvaluationError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        EvaluationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "message": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
