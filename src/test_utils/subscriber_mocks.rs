//! In-memory subscriber repository.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::subscriber::SubscriberRepoTrait,
    domain::entities::subscriber::{Subscriber, SubscriberProfile},
};

#[derive(Default)]
pub struct InMemorySubscriberRepo {
    pub subscribers: Mutex<HashMap<Uuid, SubscriberProfile>>,
    flushes: AtomicUsize,
}

impl InMemorySubscriberRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscribers(subscribers: Vec<SubscriberProfile>) -> Self {
        Self {
            subscribers: Mutex::new(subscribers.into_iter().map(|s| (s.id, s)).collect()),
            flushes: AtomicUsize::new(0),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<SubscriberProfile> {
        self.subscribers.lock().unwrap().get(&id).cloned()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubscriberRepoTrait for InMemorySubscriberRepo {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<SubscriberProfile>> {
        Ok(self.get(id))
    }

    async fn set_billing_customer_id(&self, id: Uuid, customer_id: &str) -> AppResult<()> {
        let mut subscribers = self.subscribers.lock().unwrap();
        let subscriber = subscribers.get_mut(&id).ok_or(AppError::NotFound)?;
        subscriber.billing_customer_id = Some(customer_id.to_string());
        Ok(())
    }

    // Upserts so use-case tests need not seed the repo first.
    async fn flush(&self, subscriber: &dyn Subscriber) -> AppResult<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        let mut subscribers = self.subscribers.lock().unwrap();
        let billing_customer_id = subscriber.billing_customer_id().map(str::to_string);
        subscribers.insert(
            subscriber.id(),
            SubscriberProfile {
                id: subscriber.id(),
                billing_customer_id,
                roles: subscriber.granted_roles().to_vec(),
                trial_end: subscriber.trial_end(),
            },
        );
        Ok(())
    }
}
