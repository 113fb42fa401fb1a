//! Role and plan based access checks.
//!
//! A view declares one [`AccessRequirement`]; the caller evaluates it against
//! the current [`Principal`] once per render instead of branching inline.

use serde::{Deserialize, Serialize};

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Basic,
}

/// Subscription plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Pro,
    Free,
}

/// The role and plan of whoever is looking at a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub role: Role,
    pub plan: Plan,
}

impl Principal {
    pub fn new(role: Role, plan: Plan) -> Self {
        Self { role, plan }
    }
}

/// Role and plan a view requires. Unset parts impose no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequirement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
}

impl AccessRequirement {
    /// No requirement; everyone has access.
    pub const OPEN: Self = Self {
        role: None,
        plan: None,
    };

    /// Require an exact role.
    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            plan: None,
        }
    }

    /// Require an exact plan.
    pub fn plan(plan: Plan) -> Self {
        Self {
            role: None,
            plan: Some(plan),
        }
    }

    /// Require both a role and a plan.
    pub fn role_and_plan(role: Role, plan: Plan) -> Self {
        Self {
            role: Some(role),
            plan: Some(plan),
        }
    }

    /// Check whether the principal satisfies this requirement.
    pub fn permits(&self, principal: &Principal) -> bool {
        if self.role.is_some_and(|r| r != principal.role) {
            return false;
        }
        if self.plan.is_some_and(|p| p != principal.plan) {
            return false;
        }
        true
    }
}
