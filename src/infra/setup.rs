use std::fs::File;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::http::app_state::AppState,
    application::{
        ports::billing_provider::{BillingCredentials, BillingProviderPort},
        use_cases::{
            access_control::AccessGuard, subscriber::SubscriberRepoTrait,
            subscription::SubscriptionUseCases, trial_expiry::TrialExpiryUseCases,
        },
    },
    infra::{
        config::AppConfig, postgres_persistence, settings::SubscriptionSettings,
        stripe_billing_adapter::StripeBillingAdapter,
    },
};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let settings = SubscriptionSettings::from_path(&config.subscription_config_path)?;
    let catalog = Arc::new(settings.catalog()?);
    if catalog.is_empty() {
        tracing::warn!(
            path = %config.subscription_config_path.display(),
            "Plan catalog is empty; every subscribe request will be rejected"
        );
    }
    tracing::info!(
        plans = catalog.len(),
        plan_roles = ?catalog.plan_roles(),
        path = %config.subscription_config_path.display(),
        "Loaded plan catalog"
    );

    let postgres_arc = Arc::new(postgres_persistence(&config.database_url).await?);
    let subscriber_repo_arc = postgres_arc as Arc<dyn SubscriberRepoTrait>;

    let provider = Arc::new(StripeBillingAdapter::new(config.stripe_api_base.as_str()))
        as Arc<dyn BillingProviderPort>;
    let credentials = BillingCredentials::new(config.stripe_secret_key.clone());

    let subscription_use_cases = SubscriptionUseCases::new(catalog.clone(), provider, credentials);
    let trial_expiry_use_cases =
        TrialExpiryUseCases::new(subscriber_repo_arc.clone(), settings.trial_role.clone());
    tracing::info!(
        trial_role = %trial_expiry_use_cases.trial_role(),
        "Trial expiry enabled"
    );
    let access_guard = AccessGuard::new(
        catalog,
        settings.access_denied_message(),
        settings.subscription_check.subscribe_route.clone(),
    );

    Ok(AppState {
        config: Arc::new(config),
        subscription_use_cases: Arc::new(subscription_use_cases),
        trial_expiry_use_cases: Arc::new(trial_expiry_use_cases),
        access_guard: Arc::new(access_guard),
        subscriber_repo: subscriber_repo_arc,
    })
}

/// Install the global subscriber. Returns `false` when one was already installed.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stripe_subscriptions=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer().with_target(false).with_level(true).pretty();

    // File (structured JSON logs); skipped when the file cannot be created
    let json_layer = File::create("app.log").ok().map(|file| {
        fmt::layer()
            .json()
            .with_writer(file)
            .with_current_span(true)
            .with_span_list(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_installs_once() {
        init_tracing();
        assert!(tracing::dispatcher::has_been_set());
        // Later calls, e.g. from `create_app`, keep the subscriber installed first.
        assert!(!init_tracing());
    }
}
