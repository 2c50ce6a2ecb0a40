use std::collections::HashMap;

use serde::Serialize;

use crate::app_error::{AppError, AppResult};

/// A billing tier. `name` is also the plan identifier registered with the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub name: String,
    /// Translation key of the plan's display text.
    pub display_key: String,
    pub message_domain: String,
    /// Informational only, the provider owns pricing.
    pub price: u32,
    pub currency: String,
    /// Authorization role granted to holders of this plan.
    pub role: Option<String>,
}

/// Immutable set of plans, kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
    by_name: HashMap<String, usize>,
    by_role: HashMap<String, usize>,
}

impl PlanCatalog {
    /// Build the catalog. Duplicate plan names are rejected; when two plans share a
    /// role, the first declared one owns it.
    pub fn new(plans: Vec<Plan>) -> AppResult<Self> {
        let mut by_name = HashMap::with_capacity(plans.len());
        let mut by_role = HashMap::new();

        for (idx, plan) in plans.iter().enumerate() {
            if by_name.insert(plan.name.clone(), idx).is_some() {
                return Err(AppError::InvalidInput(format!(
                    "Plan '{}' is declared more than once",
                    plan.name
                )));
            }
            if let Some(role) = &plan.role {
                by_role.entry(role.clone()).or_insert(idx);
            }
        }

        Ok(Self {
            plans,
            by_name,
            by_role,
        })
    }

    pub fn lookup(&self, name: &str) -> AppResult<&Plan> {
        self.by_name
            .get(name)
            .map(|&idx| &self.plans[idx])
            .ok_or_else(|| AppError::InvalidPlan(name.to_string()))
    }

    pub fn role_for_plan(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .and_then(|&idx| self.plans[idx].role.as_deref())
    }

    pub fn plan_for_role(&self, role: &str) -> Option<&str> {
        self.by_role
            .get(role)
            .map(|&idx| self.plans[idx].name.as_str())
    }

    pub fn is_plan_role(&self, role: &str) -> bool {
        self.by_role.contains_key(role)
    }

    /// Every role granted by some plan, in declaration order, without repeats.
    pub fn plan_roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = Vec::with_capacity(self.by_role.len());
        for role in self.plans.iter().filter_map(|plan| plan.role.as_deref()) {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        roles
    }

    /// Plans in declaration order.
    pub fn plans(&self) -> impl Iterator<Item = &Plan> {
        self.plans.iter()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
