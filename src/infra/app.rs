use axum::{Router, http};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::{
    adapters::{self, http::app_state::AppState},
    infra::setup::init_tracing,
};

/// Billing routes under `/billing`, ready to be merged into the host's router.
pub fn create_app(app_state: AppState) -> Router {
    // No-op when the binary already installed tracing.
    init_tracing();

    Router::new()
        .nest("/billing", adapters::http::routes::router())
        .with_state(app_state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http-request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id
                )
            }),
        )
}
