//! Test data factories.
//!
//! Each factory returns a valid object; the closure overrides individual fields.

use secrecy::SecretString;
use uuid::Uuid;

use crate::{
    application::ports::billing_provider::BillingCredentials,
    domain::entities::{
        plan::{Plan, PlanCatalog},
        subscriber::SubscriberProfile,
    },
};

pub const TEST_TRIAL_ROLE: &str = "ROLE_PLAN_TRIAL";

/// Create a test subscriber: a plain user with no billing customer and no trial.
pub fn create_test_subscriber(overrides: impl FnOnce(&mut SubscriberProfile)) -> SubscriberProfile {
    let mut subscriber = SubscriberProfile {
        id: Uuid::new_v4(),
        billing_customer_id: None,
        roles: vec!["ROLE_USER".to_string()],
        trial_end: None,
    };
    overrides(&mut subscriber);
    subscriber
}

pub fn create_test_plan(name: &str, overrides: impl FnOnce(&mut Plan)) -> Plan {
    let mut plan = Plan {
        name: name.to_string(),
        display_key: format!("plan.{name}"),
        message_domain: "messages".to_string(),
        price: 0,
        currency: "USD".to_string(),
        role: Some(format!("ROLE_PLAN_{}", name.to_uppercase())),
    };
    overrides(&mut plan);
    plan
}

/// `basic` (ROLE_PLAN_BASIC) declared before `pro` (ROLE_PLAN_PRO).
pub fn create_test_catalog() -> PlanCatalog {
    PlanCatalog::new(vec![
        create_test_plan("basic", |p| p.price = 500),
        create_test_plan("pro", |p| p.price = 1500),
    ])
    .expect("test catalog has unique plan names")
}

pub fn test_credentials() -> BillingCredentials {
    BillingCredentials::new(SecretString::new("sk_test_123".into()))
}
