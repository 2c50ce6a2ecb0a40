use async_trait::async_trait;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::billing_provider::{
        AttachedSubscription, BillingCredentials, BillingProviderPort, CANCELED_STATUS,
        CustomerHandle, CustomerId, SubscriptionState,
    },
    infra::stripe_client::{StripeClient, StripeCustomer, StripeSubscription},
};

/// Adapter that wraps StripeClient to implement BillingProviderPort.
///
/// A customer is treated as having at most one live subscription; plan changes swap
/// the price on that subscription's first item.
/// Statuses after which a Stripe subscription can no longer be billed or changed.
const TERMINAL_STATUSES: [&str; 2] = [CANCELED_STATUS, "incomplete_expired"];

#[derive(Clone)]
pub struct StripeBillingAdapter {
    client: StripeClient,
}

impl StripeBillingAdapter {
    pub fn new(api_base: &str) -> Self {
        Self {
            client: StripeClient::new(api_base),
        }
    }

    fn to_handle(customer: StripeCustomer) -> CustomerHandle {
        let subscription = customer
            .subscriptions
            .and_then(|list| {
                list.data
                    .into_iter()
                    .find(|sub| !TERMINAL_STATUSES.contains(&sub.status.as_str()))
            })
            .map(|sub| AttachedSubscription {
                item_id: sub.items.data.first().map(|item| item.id.clone()),
                id: sub.id,
                status: sub.status,
            });

        CustomerHandle {
            id: CustomerId::new(customer.id),
            description: customer.description,
            subscription,
        }
    }

    fn to_state(subscription: StripeSubscription) -> SubscriptionState {
        SubscriptionState {
            id: subscription.id,
            object: subscription.object,
            status: subscription.status,
        }
    }
}

#[async_trait]
impl BillingProviderPort for StripeBillingAdapter {
    async fn retrieve_customer(
        &self,
        credentials: &BillingCredentials,
        customer_id: &CustomerId,
    ) -> AppResult<CustomerHandle> {
        let customer = self
            .client
            .get_customer(credentials, customer_id.as_str())
            .await?;
        Ok(Self::to_handle(customer))
    }

    async fn update_subscription(
        &self,
        credentials: &BillingCredentials,
        customer: &CustomerHandle,
        plan_name: &str,
    ) -> AppResult<SubscriptionState> {
        let subscription = match &customer.subscription {
            Some(AttachedSubscription {
                id,
                item_id: Some(item_id),
                ..
            }) => {
                self.client
                    .update_subscription_price(credentials, id, item_id, plan_name)
                    .await?
            }
            // Never open a second subscription next to a live one.
            Some(AttachedSubscription { id, item_id: None, .. }) => {
                return Err(AppError::ProviderRejected(format!(
                    "Subscription {id} of customer {} has no item to move to plan '{plan_name}'",
                    customer.id
                )));
            }
            None => {
                self.client
                    .create_subscription(credentials, customer.id.as_str(), plan_name)
                    .await?
            }
        };
        Ok(Self::to_state(subscription))
    }

    async fn cancel_subscription(
        &self,
        credentials: &BillingCredentials,
        customer: &CustomerHandle,
    ) -> AppResult<SubscriptionState> {
        let subscription = customer.subscription.as_ref().ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Customer {} has no active subscription",
                customer.id
            ))
        })?;

        let canceled = self
            .client
            .cancel_subscription(credentials, &subscription.id)
            .await?;
        Ok(Self::to_state(canceled))
    }

    async fn create_customer(
        &self,
        credentials: &BillingCredentials,
        description: &str,
        card_token: &str,
    ) -> AppResult<CustomerHandle> {
        let customer = self
            .client
            .create_customer(credentials, description, card_token)
            .await?;
        Ok(Self::to_handle(customer))
    }
}
