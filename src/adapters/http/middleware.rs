use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::{
        jwt::{self, SubscriberClaims},
        use_cases::access_control::AccessDeniedOutcome,
    },
};

pub const SESSION_COOKIE: &str = "access_token";
pub const FLASH_COOKIE: &str = "flash_danger";

/// Roles a route requires; attach with `Extension(RequiredRoles::new([...]))`
/// outside `plan_role_middleware`.
#[derive(Clone, Debug, Default)]
pub struct RequiredRoles(pub Vec<String>);

impl RequiredRoles {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }
}

pub fn session_claims(jar: &CookieJar, app_state: &AppState) -> AppResult<SubscriberClaims> {
    let Some(access_cookie) = jar.get(SESSION_COOKIE) else {
        return Err(AppError::InvalidCredentials);
    };
    jwt::verify(access_cookie.value(), &app_state.config.jwt_secret)
}

/// Redirects to the subscribe page when the route needs a plan role the session lacks.
pub async fn plan_role_middleware(
    State(app_state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(required) = request.extensions().get::<RequiredRoles>().cloned() else {
        return Ok(next.run(request).await);
    };

    let claims = session_claims(&jar, &app_state)?;

    if let Some(outcome) = app_state.access_guard.check(&claims.roles, &required.0) {
        tracing::info!(
            subscriber = %claims.sub,
            redirect = %outcome.redirect_target,
            "Plan role required"
        );
        return Ok(access_denied_response(outcome, jar));
    }

    Ok(next.run(request).await)
}

/// Flash notice (`<domain>:<key>`) plus a 303 redirect to the subscribe page.
pub fn access_denied_response(outcome: AccessDeniedOutcome, jar: CookieJar) -> Response {
    let flash = Cookie::build((
        FLASH_COOKIE,
        format!("{}:{}", outcome.message.domain, outcome.message.key),
    ))
    .http_only(true)
    .same_site(SameSite::Lax)
    .path("/")
    .build();

    (jar.add(flash), Redirect::to(&outcome.redirect_target)).into_response()
}
