use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_evaluation_routes;
use confreg::config::AppConfig;
use confreg::error::AppError;
use confreg::store::MemoryStore;
use confreg::telemetry;
use confreg::workflows::evaluations::EvaluationService;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(EvaluationService::new(
        store.clone(),
        store.clone(),
        store,
        config.audit.actor.clone(),
    ));

    let app = with_evaluation_routes(service)
        .layer(prometheus_layer)
        .layer(axum::Extension(state));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "registration service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
