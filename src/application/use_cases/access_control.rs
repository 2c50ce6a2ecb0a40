use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::domain::entities::plan::PlanCatalog;

/// Translation key plus message domain; the host renders the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedMessage {
    pub key: String,
    pub domain: String,
}

/// Notice and redirect shown when a plan role is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDeniedOutcome {
    pub message: LocalizedMessage,
    pub redirect_target: String,
}

/// Turns "access denied" into a subscribe prompt when the missing role belongs to a plan.
#[derive(Clone)]
pub struct AccessGuard {
    catalog: Arc<PlanCatalog>,
    message: LocalizedMessage,
    subscribe_route: String,
}

impl AccessGuard {
    pub fn new(catalog: Arc<PlanCatalog>, message: LocalizedMessage, subscribe_route: String) -> Self {
        Self {
            catalog,
            message,
            subscribe_route,
        }
    }

    /// `None` means the denial has nothing to do with plans and the host handles it.
    pub fn check<R, Q>(&self, granted_roles: &[R], required_roles: &[Q]) -> Option<AccessDeniedOutcome>
    where
        R: AsRef<str>,
        Q: AsRef<str>,
    {
        let missing = required_roles
            .iter()
            .map(|role| role.as_ref())
            .find(|&required| {
                self.catalog.is_plan_role(required)
                    && !granted_roles.iter().any(|granted| granted.as_ref() == required)
            })?;

        debug!(role = %missing, "Plan role missing, redirecting to subscribe");
        Some(AccessDeniedOutcome {
            message: self.message.clone(),
            redirect_target: self.subscribe_route.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_catalog;

    fn guard() -> AccessGuard {
        AccessGuard::new(
            Arc::new(create_test_catalog()),
            LocalizedMessage {
                key: "subscription.plan_required".to_string(),
                domain: "messages".to_string(),
            },
            "/billing/plans".to_string(),
        )
    }

    #[test]
    fn test_missing_plan_role_is_redirected() {
        let outcome = guard()
            .check(&["ROLE_USER"], &["ROLE_PLAN_PRO"])
            .expect("plan role is missing");

        assert_eq!(outcome.redirect_target, "/billing/plans");
        assert_eq!(outcome.message.key, "subscription.plan_required");
        assert_eq!(outcome.message.domain, "messages");
    }

    #[test]
    fn test_held_plan_role_is_not_redirected() {
        assert_eq!(guard().check(&["ROLE_PLAN_PRO"], &["ROLE_PLAN_PRO"]), None);
    }

    #[test]
    fn test_non_plan_role_is_left_to_host() {
        assert_eq!(guard().check(&["ROLE_USER"], &["ROLE_ADMIN"]), None);
    }

    #[test]
    fn test_any_missing_plan_role_triggers() {
        let required = vec!["ROLE_ADMIN".to_string(), "ROLE_PLAN_BASIC".to_string()];
        let granted = vec!["ROLE_PLAN_PRO".to_string()];
        assert!(guard().check(&granted, &required).is_some());
    }
}
