//! In-memory billing provider that records every call.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::billing_provider::{
        AttachedSubscription, BillingCredentials, BillingProviderPort, CANCELED_STATUS,
        CustomerHandle, CustomerId, SUBSCRIPTION_OBJECT, SubscriptionState,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingCall {
    RetrieveCustomer(String),
    UpdateSubscription { customer_id: String, plan: String },
    CancelSubscription(String),
    CreateCustomer { description: String, card_token: String },
}

// ============================================================================
// InMemoryBillingProvider
// ============================================================================

pub struct InMemoryBillingProvider {
    calls: Mutex<Vec<BillingCall>>,
    update_object: String,
    cancel_status: String,
    next_customer_id: String,
    retrieve_error: Mutex<Option<AppError>>,
}

impl Default for InMemoryBillingProvider {
    fn default() -> Self {
        Self {
            calls: Mutex::new(vec![]),
            update_object: SUBSCRIPTION_OBJECT.to_string(),
            cancel_status: CANCELED_STATUS.to_string(),
            next_customer_id: "cus_test".to_string(),
            retrieve_error: Mutex::new(None),
        }
    }
}

impl InMemoryBillingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Object kind reported by `update_subscription`.
    pub fn with_update_object(mut self, object: &str) -> Self {
        self.update_object = object.to_string();
        self
    }

    /// Status reported by `cancel_subscription`.
    pub fn with_cancel_status(mut self, status: &str) -> Self {
        self.cancel_status = status.to_string();
        self
    }

    pub fn with_next_customer_id(mut self, id: &str) -> Self {
        self.next_customer_id = id.to_string();
        self
    }

    /// Fail the next `retrieve_customer` call with `error`.
    pub fn fail_retrieve_with(&self, error: AppError) {
        *self.retrieve_error.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> Vec<BillingCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: BillingCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BillingProviderPort for InMemoryBillingProvider {
    async fn retrieve_customer(
        &self,
        _credentials: &BillingCredentials,
        customer_id: &CustomerId,
    ) -> AppResult<CustomerHandle> {
        self.record(BillingCall::RetrieveCustomer(customer_id.to_string()));
        if let Some(error) = self.retrieve_error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(CustomerHandle {
            id: customer_id.clone(),
            description: None,
            subscription: Some(AttachedSubscription {
                id: "sub_test".to_string(),
                item_id: Some("si_test".to_string()),
                status: "active".to_string(),
            }),
        })
    }

    async fn update_subscription(
        &self,
        _credentials: &BillingCredentials,
        customer: &CustomerHandle,
        plan_name: &str,
    ) -> AppResult<SubscriptionState> {
        self.record(BillingCall::UpdateSubscription {
            customer_id: customer.id.to_string(),
            plan: plan_name.to_string(),
        });
        Ok(SubscriptionState {
            id: "sub_test".to_string(),
            object: self.update_object.clone(),
            status: "active".to_string(),
        })
    }

    async fn cancel_subscription(
        &self,
        _credentials: &BillingCredentials,
        customer: &CustomerHandle,
    ) -> AppResult<SubscriptionState> {
        self.record(BillingCall::CancelSubscription(customer.id.to_string()));
        Ok(SubscriptionState {
            id: "sub_test".to_string(),
            object: SUBSCRIPTION_OBJECT.to_string(),
            status: self.cancel_status.clone(),
        })
    }

    async fn create_customer(
        &self,
        _credentials: &BillingCredentials,
        description: &str,
        card_token: &str,
    ) -> AppResult<CustomerHandle> {
        self.record(BillingCall::CreateCustomer {
            description: description.to_string(),
            card_token: card_token.to_string(),
        });
        Ok(CustomerHandle {
            id: CustomerId::new(self.next_customer_id.clone()),
            description: Some(description.to_string()),
            subscription: None,
        })
    }
}
