use axum::{
    Form, Json, Router,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    adapters::http::{app_state::AppState, middleware::session_claims},
    app_error::{AppError, AppResult},
    domain::entities::{plan::Plan, subscriber::SubscriberProfile},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/plans", get(list_plans)).route(
        "/subscription",
        get(get_subscription)
            .post(change_plan)
            .delete(cancel_subscription),
    )
}

// ============================================================================
// GET /plans
// ============================================================================

#[derive(Serialize)]
struct PlansResponse<'a> {
    public_key: &'a str,
    payee_name: Option<&'a str>,
    plans: Vec<&'a Plan>,
}

async fn list_plans(State(app_state): State<AppState>) -> impl IntoResponse {
    let catalog = app_state.subscription_use_cases.catalog();
    Json(PlansResponse {
        public_key: &app_state.config.stripe_public_key,
        payee_name: app_state.config.payee_name.as_deref(),
        plans: catalog.plans().collect(),
    })
    .into_response()
}

// ============================================================================
// GET /subscription
// ============================================================================

#[derive(Serialize)]
struct SubscriptionResponse {
    plan: Option<String>,
    trial_end: Option<DateTime<Utc>>,
    has_billing_customer: bool,
}

async fn get_subscription(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let subscriber = current_subscriber(&jar, &app_state).await?;

    let plan = app_state
        .subscription_use_cases
        .current_plan(&subscriber)
        .map(str::to_string);

    Ok(Json(SubscriptionResponse {
        plan,
        trial_end: subscriber.trial_end,
        has_billing_customer: subscriber.billing_customer_id.is_some(),
    }))
}

// ============================================================================
// POST /subscription
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
struct PlanForm {
    #[validate(length(min = 1))]
    selected_plan: String,
    /// Card token from Stripe.js; only needed while the subscriber has no customer.
    /// The hidden field submits empty once a customer exists.
    stripe_token: Option<String>,
}

#[derive(Serialize)]
struct PlanChangeResponse {
    requested_plan: String,
}

async fn change_plan(
    State(app_state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<PlanForm>, FormRejection>,
) -> AppResult<impl IntoResponse> {
    let Form(form) = form.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    form.validate()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let mut subscriber = current_subscriber(&jar, &app_state).await?;
    let use_cases = &app_state.subscription_use_cases;

    // Reject unknown plans before a customer is created for them.
    use_cases.catalog().lookup(&form.selected_plan)?;

    if subscriber.billing_customer_id.is_none()
        && let Some(token) = form.stripe_token.as_deref().filter(|t| !t.is_empty())
    {
        let customer_id = use_cases
            .create_billing_customer(token, &subscriber.id.to_string())
            .await?;
        app_state
            .subscriber_repo
            .set_billing_customer_id(subscriber.id, &customer_id)
            .await?;
        subscriber.billing_customer_id = Some(customer_id);
    }

    use_cases
        .set_plan(&subscriber, Some(&form.selected_plan))
        .await?;

    Ok(Json(PlanChangeResponse {
        requested_plan: form.selected_plan,
    }))
}

// ============================================================================
// DELETE /subscription
// ============================================================================

async fn cancel_subscription(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<StatusCode> {
    let subscriber = current_subscriber(&jar, &app_state).await?;
    app_state.subscription_use_cases.cancel(&subscriber).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn current_subscriber(jar: &CookieJar, app_state: &AppState) -> AppResult<SubscriberProfile> {
    let claims = session_claims(jar, app_state)?;
    app_state
        .subscriber_repo
        .get_by_id(claims.subscriber_id()?)
        .await?
        .ok_or(AppError::InvalidCredentials)
}
