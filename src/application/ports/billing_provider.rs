use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::app_error::AppResult;

// ============================================================================
// Port Types - Provider-agnostic domain types
// ============================================================================

/// Object kind the provider reports for a subscription it has created or changed.
pub const SUBSCRIPTION_OBJECT: &str = "subscription";

/// Subscription status the provider reports once a cancellation took effect.
pub const CANCELED_STATUS: &str = "canceled";

/// Unique identifier for a customer in a payment provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Secret used to authenticate a group of provider calls.
///
/// Passed to every call instead of being installed as process-wide state.
#[derive(Clone)]
pub struct BillingCredentials {
    pub secret_key: SecretString,
}

impl BillingCredentials {
    pub fn new(secret_key: SecretString) -> Self {
        Self { secret_key }
    }
}

impl std::fmt::Debug for BillingCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingCredentials")
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Subscription currently attached to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachedSubscription {
    pub id: String,
    /// Subscription item holding the plan; replaced on plan change.
    pub item_id: Option<String>,
    pub status: String,
}

/// Customer record as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerHandle {
    pub id: CustomerId,
    pub description: Option<String>,
    pub subscription: Option<AttachedSubscription>,
}

/// Provider response to a subscription update or cancellation.
///
/// `object` and `status` are reported verbatim so the caller can decide whether the
/// provider reached the requested state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionState {
    pub id: String,
    pub object: String,
    pub status: String,
}

// ============================================================================
// Billing Provider Port
// ============================================================================

#[async_trait]
pub trait BillingProviderPort: Send + Sync {
    async fn retrieve_customer(
        &self,
        credentials: &BillingCredentials,
        customer_id: &CustomerId,
    ) -> AppResult<CustomerHandle>;

    /// Put the customer's subscription on `plan_name`, creating the subscription if the
    /// customer has none.
    async fn update_subscription(
        &self,
        credentials: &BillingCredentials,
        customer: &CustomerHandle,
        plan_name: &str,
    ) -> AppResult<SubscriptionState>;

    /// Cancel the customer's subscription immediately.
    async fn cancel_subscription(
        &self,
        credentials: &BillingCredentials,
        customer: &CustomerHandle,
    ) -> AppResult<SubscriptionState>;

    /// Create a customer paying with `card_token`, described by `description`.
    async fn create_customer(
        &self,
        credentials: &BillingCredentials,
        description: &str,
        card_token: &str,
    ) -> AppResult<CustomerHandle>;
}
