use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::{
    app_error::{AppError, AppResult},
    application::ports::billing_provider::{
        BillingCredentials, BillingProviderPort, CANCELED_STATUS, CustomerId, SUBSCRIPTION_OBJECT,
    },
    domain::entities::{plan::PlanCatalog, subscriber::Subscriber},
};

// ============================================================================
// Use Cases
// ============================================================================

/// Subscribes and unsubscribes subscribers from catalog plans.
#[derive(Clone)]
pub struct SubscriptionUseCases {
    catalog: Arc<PlanCatalog>,
    provider: Arc<dyn BillingProviderPort>,
    credentials: BillingCredentials,
}

impl SubscriptionUseCases {
    pub fn new(
        catalog: Arc<PlanCatalog>,
        provider: Arc<dyn BillingProviderPort>,
        credentials: BillingCredentials,
    ) -> Self {
        Self {
            catalog,
            provider,
            credentials,
        }
    }

    pub fn catalog(&self) -> &PlanCatalog {
        &self.catalog
    }

    /// Put the subscriber on `desired_plan`, or cancel the subscription when `None`.
    #[instrument(skip(self, subscriber), fields(subscriber_id = %subscriber.id()))]
    pub async fn set_plan(
        &self,
        subscriber: &dyn Subscriber,
        desired_plan: Option<&str>,
    ) -> AppResult<()> {
        let Some(plan_name) = desired_plan else {
            return self.cancel(subscriber).await;
        };

        let plan = self.catalog.lookup(plan_name)?;
        let customer_id = billing_identity(subscriber)?;

        let customer = self
            .provider
            .retrieve_customer(&self.credentials, &customer_id)
            .await?;

        debug!(plan = %plan.name, customer_id = %customer.id, "About to subscribe subscriber to plan");
        let result = self
            .provider
            .update_subscription(&self.credentials, &customer, &plan.name)
            .await?;
        debug!(result = ?result, "Subscription result");

        if result.object != SUBSCRIPTION_OBJECT {
            warn!(plan = %plan.name, object = %result.object, "Provider did not confirm subscription");
            return Err(AppError::ProviderRejected(format!(
                "Subscribing subscriber {} to plan '{}' failed (provider returned '{}')",
                subscriber.id(),
                plan.name,
                result.object
            )));
        }

        Ok(())
    }

    /// Cancel the subscriber's subscription immediately.
    #[instrument(skip(self, subscriber), fields(subscriber_id = %subscriber.id()))]
    pub async fn cancel(&self, subscriber: &dyn Subscriber) -> AppResult<()> {
        let customer_id = billing_identity(subscriber)?;

        let customer = self
            .provider
            .retrieve_customer(&self.credentials, &customer_id)
            .await?;

        debug!(customer_id = %customer.id, "About to cancel subscription");
        let result = self
            .provider
            .cancel_subscription(&self.credentials, &customer)
            .await?;
        debug!(result = ?result, "Unsubscribe result");

        if result.status != CANCELED_STATUS {
            warn!(status = %result.status, "Provider did not confirm cancellation");
            return Err(AppError::ProviderRejected(format!(
                "Unsubscribing subscriber {} failed (subscription status '{}')",
                subscriber.id(),
                result.status
            )));
        }

        Ok(())
    }

    /// Create a provider customer paying with `card_token`.
    ///
    /// `local_label` becomes the customer description, usually the local subscriber id.
    /// Returns the provider's customer id as-is.
    #[instrument(skip(self, card_token))]
    pub async fn create_billing_customer(
        &self,
        card_token: &str,
        local_label: &str,
    ) -> AppResult<String> {
        let customer = self
            .provider
            .create_customer(&self.credentials, local_label, card_token)
            .await?;
        debug!(customer_id = %customer.id, "Created billing customer");
        Ok(customer.id.0)
    }

    /// The first plan, in catalog order, whose role the subscriber holds.
    pub fn current_plan(&self, subscriber: &dyn Subscriber) -> Option<&str> {
        self.catalog
            .plans()
            .find(|plan| {
                plan.role
                    .as_deref()
                    .is_some_and(|role| subscriber.has_role(role))
            })
            .map(|plan| plan.name.as_str())
    }
}

// ============================================================================
// Private Helpers
// ============================================================================

fn billing_identity(subscriber: &dyn Subscriber) -> AppResult<CustomerId> {
    subscriber
        .billing_customer_id()
        .map(CustomerId::new)
        .ok_or_else(|| AppError::MissingBillingIdentity(subscriber.id()))
}
