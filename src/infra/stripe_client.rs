use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::billing_provider::BillingCredentials,
};

pub const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Thin Stripe REST client. Credentials are supplied per call.
#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    api_base: String,
}

impl StripeClient {
    pub fn new(api_base: &str) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn auth_header(credentials: &BillingCredentials) -> String {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:", credentials.secret_key.expose_secret()));
        format!("Basic {}", encoded)
    }

    // ========================================================================
    // Customers
    // ========================================================================

    /// Fetch a customer together with its subscriptions.
    pub async fn get_customer(
        &self,
        credentials: &BillingCredentials,
        customer_id: &str,
    ) -> AppResult<StripeCustomer> {
        let response = self
            .client
            .get(format!("{}/customers/{}", self.api_base, customer_id))
            .header("Authorization", Self::auth_header(credentials))
            .query(&[("expand[]", "subscriptions")])
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Stripe request failed: {}", e)))?;

        self.handle_response(response).await
    }

    pub async fn create_customer(
        &self,
        credentials: &BillingCredentials,
        description: &str,
        card_token: &str,
    ) -> AppResult<StripeCustomer> {
        let params = [("description", description), ("source", card_token)];

        let response = self
            .client
            .post(format!("{}/customers", self.api_base))
            .header("Authorization", Self::auth_header(credentials))
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Stripe request failed: {}", e)))?;

        self.handle_response(response).await
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    pub async fn create_subscription(
        &self,
        credentials: &BillingCredentials,
        customer_id: &str,
        price_id: &str,
    ) -> AppResult<StripeSubscription> {
        let params = [("customer", customer_id), ("items[0][price]", price_id)];

        let response = self
            .client
            .post(format!("{}/subscriptions", self.api_base))
            .header("Authorization", Self::auth_header(credentials))
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Stripe request failed: {}", e)))?;

        self.handle_response(response).await
    }

    /// Swap the price on an existing subscription item.
    pub async fn update_subscription_price(
        &self,
        credentials: &BillingCredentials,
        subscription_id: &str,
        item_id: &str,
        price_id: &str,
    ) -> AppResult<StripeSubscription> {
        let params = [("items[0][id]", item_id), ("items[0][price]", price_id)];

        let response = self
            .client
            .post(format!("{}/subscriptions/{}", self.api_base, subscription_id))
            .header("Authorization", Self::auth_header(credentials))
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Stripe request failed: {}", e)))?;

        self.handle_response(response).await
    }

    /// Cancel immediately.
    pub async fn cancel_subscription(
        &self,
        credentials: &BillingCredentials,
        subscription_id: &str,
    ) -> AppResult<StripeSubscription> {
        let response = self
            .client
            .delete(format!("{}/subscriptions/{}", self.api_base, subscription_id))
            .header("Authorization", Self::auth_header(credentials))
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Stripe request failed: {}", e)))?;

        self.handle_response(response).await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> AppResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read response: {}", e)))?;

        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::warn!(body = %body, "Stripe resource not found");
            return Err(AppError::NotFound);
        }

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Stripe API error");

            if let Ok(error) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(AppError::InvalidInput(format!(
                    "Stripe error: {}",
                    error.error.message.unwrap_or(error.error.error_type)
                )));
            }

            return Err(AppError::Internal(format!(
                "Stripe API error: {} - {}",
                status, body
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(body = %body, error = %e, "Failed to parse Stripe response");
            AppError::Internal(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

// ============================================================================
// Stripe Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StripeList<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct StripeCustomer {
    pub id: String,
    pub description: Option<String>,
    pub subscriptions: Option<StripeList<StripeSubscription>>,
}

#[derive(Debug, Deserialize)]
pub struct StripeSubscription {
    pub id: String,
    pub object: String,
    pub status: String,
    pub items: StripeList<StripeSubscriptionItem>,
}

#[derive(Debug, Deserialize)]
pub struct StripeSubscriptionItem {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeError,
}

#[derive(Debug, Deserialize)]
pub struct StripeError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: Option<String>,
    pub code: Option<String>,
}
