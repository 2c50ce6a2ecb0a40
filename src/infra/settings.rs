//! Plan catalog and subscription settings, loaded once at startup from a JSON file.
//!
//! ```json
//! {
//!   "plans": [
//!     { "name": "basic", "i18nKey": "plan.basic", "price": 900, "role": "ROLE_PLAN_BASIC" },
//!     { "name": "pro", "i18nKey": "plan.pro", "price": 2900, "currency": "EUR", "role": "ROLE_PLAN_PRO" }
//!   ],
//!   "subscription_check": { "subscribe_route": "/billing/plans" },
//!   "trial_role": "ROLE_PLAN_TRIAL"
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use validator::Validate;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::access_control::LocalizedMessage,
    domain::entities::plan::{Plan, PlanCatalog},
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubscriptionSettings {
    #[validate(nested)]
    pub plans: Vec<PlanSettings>,
    #[validate(nested)]
    pub subscription_check: SubscriptionCheckSettings,
    #[serde(default = "default_trial_role")]
    #[validate(length(min = 1))]
    pub trial_role: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlanSettings {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(rename = "i18nKey")]
    #[validate(length(min = 1))]
    pub i18n_key: String,
    #[serde(rename = "messageDomain", default = "default_message_domain")]
    #[validate(length(min = 1))]
    pub message_domain: String,
    #[validate(range(max = 100_000))]
    pub price: u32,
    #[serde(default = "default_currency")]
    #[validate(length(min = 1))]
    pub currency: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubscriptionCheckSettings {
    #[validate(length(min = 1))]
    pub subscribe_route: String,
    #[serde(default = "default_required_i18n_key")]
    pub subscription_required_i18n_key: String,
    #[serde(default = "default_message_domain")]
    #[validate(length(min = 1))]
    pub subscription_required_message_domain: String,
}

fn default_trial_role() -> String {
    "ROLE_PLAN_TRIAL".to_string()
}

fn default_message_domain() -> String {
    "messages".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_required_i18n_key() -> String {
    "subscription.plan_required".to_string()
}

impl SubscriptionSettings {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Cannot read subscription settings {}: {e}", path.display())
        })?;
        Ok(Self::from_json(&raw)?)
    }

    pub fn from_json(raw: &str) -> AppResult<Self> {
        let settings: Self = serde_json::from_str(raw)
            .map_err(|e| AppError::InvalidInput(format!("Malformed subscription settings: {e}")))?;
        settings
            .validate()
            .map_err(|e| AppError::InvalidInput(format!("Invalid subscription settings: {e}")))?;
        Ok(settings)
    }

    /// Build the immutable catalog; fails on duplicate plan names.
    pub fn catalog(&self) -> AppResult<PlanCatalog> {
        let plans = self
            .plans
            .iter()
            .map(|p| Plan {
                name: p.name.clone(),
                display_key: p.i18n_key.clone(),
                message_domain: p.message_domain.clone(),
                price: p.price,
                currency: p.currency.clone(),
                role: p.role.clone(),
            })
            .collect();
        PlanCatalog::new(plans)
    }

    pub fn access_denied_message(&self) -> LocalizedMessage {
        LocalizedMessage {
            key: self.subscription_check.subscription_required_i18n_key.clone(),
            domain: self
                .subscription_check
                .subscription_required_message_domain
                .clone(),
        }
    }
}
