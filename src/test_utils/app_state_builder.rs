//! Builds an `AppState` backed by in-memory mocks for HTTP tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum_extra::extract::cookie::Cookie;
use secrecy::SecretString;
use time::Duration;
use url::Url;

use crate::{
    adapters::http::{app_state::AppState, middleware::SESSION_COOKIE},
    application::{
        jwt,
        use_cases::{
            access_control::{AccessGuard, LocalizedMessage},
            subscription::SubscriptionUseCases,
            trial_expiry::TrialExpiryUseCases,
        },
    },
    domain::entities::subscriber::SubscriberProfile,
    infra::config::AppConfig,
    test_utils::{
        InMemoryBillingProvider, InMemorySubscriberRepo, TEST_TRIAL_ROLE, create_test_catalog,
        test_credentials,
    },
};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-bytes-long";
pub const TEST_SUBSCRIBE_ROUTE: &str = "/billing/plans";

/// Session cookie carrying the subscriber's id and current roles.
pub fn session_cookie(subscriber: &SubscriberProfile) -> Cookie<'static> {
    let token = jwt::issue(
        subscriber.id,
        subscriber.roles.clone(),
        &SecretString::new(TEST_JWT_SECRET.into()),
        Duration::minutes(15),
    )
    .expect("test token signs");
    Cookie::new(SESSION_COOKIE, token)
}

fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        stripe_secret_key: SecretString::new("sk_test_123".into()),
        stripe_public_key: "pk_test_123".to_string(),
        payee_name: Some("Acme".to_string()),
        stripe_api_base: Url::parse("http://stripe.test").expect("valid test url"),
        database_url: "postgres://unused".to_string(),
        jwt_secret: SecretString::new(TEST_JWT_SECRET.into()),
        subscription_config_path: PathBuf::from("subscription.json"),
    }
}

/// ```ignore
/// let (app_state, repo, provider) = TestAppStateBuilder::new()
///     .with_subscriber(create_test_subscriber(|_| {}))
///     .build();
/// ```
#[derive(Default)]
pub struct TestAppStateBuilder {
    subscribers: Vec<SubscriberProfile>,
    provider: Option<InMemoryBillingProvider>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriber(mut self, subscriber: SubscriberProfile) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    pub fn with_provider(mut self, provider: InMemoryBillingProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn build(
        self,
    ) -> (
        AppState,
        Arc<InMemorySubscriberRepo>,
        Arc<InMemoryBillingProvider>,
    ) {
        let catalog = Arc::new(create_test_catalog());
        let repo = Arc::new(InMemorySubscriberRepo::with_subscribers(self.subscribers));
        let provider = Arc::new(self.provider.unwrap_or_default());

        let subscription_use_cases =
            SubscriptionUseCases::new(catalog.clone(), provider.clone(), test_credentials());
        let trial_expiry_use_cases =
            TrialExpiryUseCases::new(repo.clone(), TEST_TRIAL_ROLE.to_string());
        let access_guard = AccessGuard::new(
            catalog,
            LocalizedMessage {
                key: "subscription.plan_required".to_string(),
                domain: "messages".to_string(),
            },
            TEST_SUBSCRIBE_ROUTE.to_string(),
        );

        let app_state = AppState {
            config: Arc::new(test_config()),
            subscription_use_cases: Arc::new(subscription_use_cases),
            trial_expiry_use_cases: Arc::new(trial_expiry_use_cases),
            access_guard: Arc::new(access_guard),
            subscriber_repo: repo.clone(),
        };

        (app_state, repo, provider)
    }
}
