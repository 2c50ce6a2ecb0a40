pub mod session;
pub mod subscription;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(subscription::router())
        .merge(session::router())
}
