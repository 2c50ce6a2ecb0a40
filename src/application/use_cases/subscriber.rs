use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    app_error::AppResult,
    domain::entities::subscriber::{Subscriber, SubscriberProfile},
};

#[async_trait]
pub trait SubscriberRepoTrait: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<SubscriberProfile>>;

    async fn set_billing_customer_id(&self, id: Uuid, customer_id: &str) -> AppResult<()>;

    /// Write the subscriber's roles and trial end immediately.
    async fn flush(&self, subscriber: &dyn Subscriber) -> AppResult<()>;
}
