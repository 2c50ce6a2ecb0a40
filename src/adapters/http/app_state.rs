use std::sync::Arc;

use crate::{
    application::use_cases::{
        access_control::AccessGuard, subscriber::SubscriberRepoTrait,
        subscription::SubscriptionUseCases, trial_expiry::TrialExpiryUseCases,
    },
    infra::config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub subscription_use_cases: Arc<SubscriptionUseCases>,
    pub trial_expiry_use_cases: Arc<TrialExpiryUseCases>,
    pub access_guard: Arc<AccessGuard>,
    pub subscriber_repo: Arc<dyn SubscriberRepoTrait>,
}
