use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// What the billing use cases need from an application user.
///
/// Host applications implement this for their own user type; `SubscriberProfile`
/// is the implementation backed by this crate's persistence.
pub trait Subscriber: Send + Sync {
    fn id(&self) -> Uuid;

    /// Customer reference on the billing provider side, if one was created.
    fn billing_customer_id(&self) -> Option<&str>;

    fn granted_roles(&self) -> &[String];

    /// End of the time-boxed trial, if the subscriber is on one.
    fn trial_end(&self) -> Option<DateTime<Utc>>;

    fn revoke_role(&mut self, role: &str);

    fn set_trial_end(&mut self, trial_end: Option<DateTime<Utc>>);

    fn has_role(&self, role: &str) -> bool {
        self.granted_roles().iter().any(|r| r == role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriberProfile {
    pub id: Uuid,
    pub billing_customer_id: Option<String>,
    pub roles: Vec<String>,
    pub trial_end: Option<DateTime<Utc>>,
}

impl Subscriber for SubscriberProfile {
    fn id(&self) -> Uuid {
        self.id
    }

    fn billing_customer_id(&self) -> Option<&str> {
        self.billing_customer_id.as_deref()
    }

    fn granted_roles(&self) -> &[String] {
        &self.roles
    }

    fn trial_end(&self) -> Option<DateTime<Utc>> {
        self.trial_end
    }

    fn revoke_role(&mut self, role: &str) {
        self.roles.retain(|r| r != role);
    }

    fn set_trial_end(&mut self, trial_end: Option<DateTime<Utc>>) {
        self.trial_end = trial_end;
    }
}
