//! Authorization Policy
//! Mission: Decide ownership/role access for mutating operations

use crate::auth::models::{Principal, Role};

/// Why access was granted or refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessReason {
    /// Principal owns the resource
    Owner,
    /// Admin role bypasses the ownership check
    AdminOverride,
    /// Neither owner nor admin
    Denied,
}

/// Outcome of an ownership check. Computed per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: AccessReason,
}

/// Decide whether `principal` may mutate a resource owned by `owner_id`.
///
/// Admins may mutate anything (checked first, so an admin-owner still reports
/// `AdminOverride`); everyone else only their own resources. Pure and
/// deterministic: no I/O, no mutation.
pub fn decide(principal: &Principal, owner_id: &str) -> AccessDecision {
    if principal.role == Role::Admin {
        return AccessDecision {
            allowed: true,
            reason: AccessReason::AdminOverride,
        };
    }

    if principal.id == owner_id {
        return AccessDecision {
            allowed: true,
            reason: AccessReason::Owner,
        };
    }

    AccessDecision {
        allowed: false,
        reason: AccessReason::Denied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(id: &str, role: Role) -> Principal {
        Principal {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            role,
        }
    }

    #[test]
    fn test_user_owner_allowed() {
        let decision = decide(&principal("u1", Role::User), "u1");
        assert!(decision.allowed);
        assert_eq!(decision.reason, AccessReason::Owner);
    }

    #[test]
    fn test_user_non_owner_denied() {
        let decision = decide(&principal("u1", Role::User), "u2");
        assert!(!decision.allowed);
        assert_eq!(decision.reason, AccessReason::Denied);
    }

    #[test]
    fn test_admin_non_owner_allowed() {
        let decision = decide(&principal("u1", Role::Admin), "u2");
        assert!(decision.allowed);
        assert_eq!(decision.reason, AccessReason::AdminOverride);
    }

    #[test]
    fn test_admin_owner_reports_override() {
        // Admin check runs first even when the admin owns the resource
        let decision = decide(&principal("u1", Role::Admin), "u1");
        assert!(decision.allowed);
        assert_eq!(decision.reason, AccessReason::AdminOverride);
    }
}
