use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, health, inventory, job, report, user};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Identity
        .route("/api/auth/me", get(auth::me))
        .route("/api/users", get(user::list_users).post(user::create_user))

        // Jobs
        .route("/api/jobs", get(job::list_jobs).post(job::create_job))
        .route("/api/jobs/dashboard", get(job::dashboard))
        .route("/api/jobs/{id}", get(job::get_job).put(job::update_job).delete(job::delete_job))
        .route("/api/jobs/{id}/assignments", get(job::list_job_assignments))
        .route("/api/jobs/{id}/media", post(job::attach_media))

        // Inventory
        .route("/api/inventory", get(inventory::list_items).post(inventory::create_item))
        .route("/api/inventory/{id}/check-out", post(inventory::check_out))
        .route("/api/inventory/{id}/check-in", post(inventory::check_in))

        // Reports
        .route("/api/reports/inventory-usage", get(report::inventory_usage))
        .route("/api/reports/job-summary", get(report::job_summary))
        .route("/api/reports/inventory-status", get(report::inventory_status))
        .route("/api/reports/overdue-items", get(report::overdue_items))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                        role = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
