use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::{
    adapters::http::{
        app_state::AppState,
        middleware::{SESSION_COOKIE, session_claims},
    },
    app_error::{AppError, AppResult},
    application::{jwt, use_cases::trial_expiry::SessionOutcome},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/session/refresh", post(refresh_session))
}

#[derive(Serialize)]
struct RefreshResponse {
    outcome: SessionOutcome,
    roles: Vec<String>,
}

/// Called by the host right after login. Expires a lapsed trial and, when that
/// changed the subscriber's roles, reissues the session cookie with the new set.
async fn refresh_session(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let claims = session_claims(&jar, &app_state)?;
    let subscriber_id = claims.subscriber_id()?;

    let outcome = app_state
        .trial_expiry_use_cases
        .on_authentication_success(subscriber_id)
        .await?;

    if outcome == SessionOutcome::Keep {
        return Ok((
            jar,
            Json(RefreshResponse {
                outcome,
                roles: claims.roles,
            }),
        ));
    }

    let subscriber = app_state
        .subscriber_repo
        .get_by_id(subscriber_id)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    // The reissued token expires when the old one did.
    let remaining = claims.exp - OffsetDateTime::now_utc().unix_timestamp();
    let token = jwt::issue(
        subscriber_id,
        subscriber.roles.clone(),
        &app_state.config.jwt_secret,
        Duration::seconds(remaining.max(0)),
    )?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build();

    tracing::info!(subscriber = %subscriber_id, "Session rebuilt after trial expiry");

    Ok((
        jar.add(cookie),
        Json(RefreshResponse {
            outcome,
            roles: subscriber.roles,
        }),
    ))
}
