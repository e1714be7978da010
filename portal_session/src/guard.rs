//! Route guard decisions.
//!
//! Pure function from session state plus route requirements to a decision;
//! the integration layer (middleware, frontend shell) turns the decision
//! into a response or navigation. Keeping this pure means every branch is
//! trivially testable.

use crate::role::{CanonicalRole, PortalFamily};
use crate::session::{SessionState, SessionUser};

#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    /// Session still booting; render nothing yet, do not redirect.
    Loading,
    /// Not signed in (or signed in to the wrong portal family's provider);
    /// go to the named login route.
    RedirectToLogin(String),
    /// Signed in with a role this route does not allow; go to the role's
    /// own home instead of bouncing through login again.
    RedirectToRoleHome(String),
    Allow(SessionUser),
}

/// Decide whether the current session may enter a route of `portal` that
/// admits `allowed` roles.
///
/// An empty `allowed` slice means any role of the portal family may enter.
pub fn evaluate(
    state: &SessionState,
    allowed: &[CanonicalRole],
    portal: PortalFamily,
) -> GuardDecision {
    let user = match state {
        SessionState::Booting => return GuardDecision::Loading,
        SessionState::Unauthenticated => {
            return GuardDecision::RedirectToLogin(portal.login_route().to_string());
        }
        SessionState::Authenticated(user) => user,
    };

    let admitted = if allowed.is_empty() {
        portal.allows(user.role)
    } else {
        allowed.contains(&user.role)
    };
    if admitted {
        return GuardDecision::Allow(user.clone());
    }

    tracing::debug!(
        role = %user.role,
        portal = %portal,
        "Role not admitted, redirecting"
    );

    // Marketplace roles are sent to their own portal's login; a buyer
    // session is worthless on the vendor portal and vice versa. Internal
    // roles stay signed in and land on their own home.
    match user.role {
        CanonicalRole::Buyer | CanonicalRole::Vendor => {
            GuardDecision::RedirectToLogin(user.role.portal_family().login_route().to_string())
        }
        role => GuardDecision::RedirectToRoleHome(
            role.home_route().unwrap_or("/unauthorized").to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: CanonicalRole) -> SessionUser {
        SessionUser {
            id: "u-1".to_string(),
            email: "u@example.com".to_string(),
            display_name: "U".to_string(),
            role,
            avatar_url: None,
        }
    }

    fn authed(role: CanonicalRole) -> SessionState {
        SessionState::Authenticated(user(role))
    }

    #[test]
    fn test_booting_is_loading_never_redirect() {
        let decision = evaluate(&SessionState::Booting, &[], PortalFamily::Buyer);
        assert_eq!(decision, GuardDecision::Loading);
    }

    #[test]
    fn test_unauthenticated_redirects_to_portal_login() {
        let decision = evaluate(&SessionState::Unauthenticated, &[], PortalFamily::Vendor);
        assert_eq!(
            decision,
            GuardDecision::RedirectToLogin("/vendor/login".to_string())
        );
    }

    #[test]
    fn test_allowed_role_is_admitted() {
        let decision = evaluate(
            &authed(CanonicalRole::Vendor),
            &[CanonicalRole::Vendor],
            PortalFamily::Vendor,
        );
        assert!(matches!(decision, GuardDecision::Allow(u) if u.role == CanonicalRole::Vendor));
    }

    #[test]
    fn test_empty_allow_list_admits_whole_portal_family() {
        let decision = evaluate(&authed(CanonicalRole::Finance), &[], PortalFamily::Internal);
        assert!(matches!(decision, GuardDecision::Allow(_)));

        let decision = evaluate(&authed(CanonicalRole::Buyer), &[], PortalFamily::Internal);
        assert!(!matches!(decision, GuardDecision::Allow(_)));
    }

    #[test]
    fn test_marketplace_role_on_wrong_portal_goes_to_its_own_login() {
        let decision = evaluate(
            &authed(CanonicalRole::Buyer),
            &[CanonicalRole::Vendor],
            PortalFamily::Vendor,
        );
        assert_eq!(
            decision,
            GuardDecision::RedirectToLogin("/buyer/login".to_string())
        );
    }

    #[test]
    fn test_internal_role_on_disallowed_route_goes_home() {
        let decision = evaluate(
            &authed(CanonicalRole::Hr),
            &[CanonicalRole::Admin],
            PortalFamily::Internal,
        );
        assert_eq!(
            decision,
            GuardDecision::RedirectToRoleHome("/hr".to_string())
        );
    }

    #[test]
    fn test_superadmin_is_not_admitted_to_internal_routes() {
        let decision = evaluate(
            &authed(CanonicalRole::Superadmin),
            &[CanonicalRole::Admin],
            PortalFamily::Internal,
        );
        assert!(
            !matches!(decision, GuardDecision::Allow(_)),
            "The superadmin console is a separate track, not a skeleton key"
        );
    }
}
