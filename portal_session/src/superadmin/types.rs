use serde::{Deserialize, Serialize};

use super::errors::SuperAdminError;
use crate::role::{CanonicalRole, NormalizedRole, normalize};
use crate::session::{SessionState, SessionUser};

/// Account record served by the superadmin API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuperAdmin {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Role string as the API returned it. Older API deployments omit the
    /// field entirely.
    #[serde(default)]
    pub role: Option<String>,
}

impl SuperAdmin {
    /// Verify the account's role claim.
    ///
    /// The superadmin API endpoint is only reachable by superadmin accounts,
    /// so a missing or empty role field is accepted as SUPERADMIN with a
    /// warning. Any other explicit role is a hard rejection: an account the
    /// API labels as something else has no business here.
    pub fn verified_role(&self) -> Result<CanonicalRole, SuperAdminError> {
        match normalize(self.role.as_deref()) {
            None => {
                tracing::warn!(
                    account = %self.id,
                    "SuperAdmin API returned no role field, trusting endpoint scope"
                );
                Ok(CanonicalRole::Superadmin)
            }
            Some(NormalizedRole::Known(CanonicalRole::Superadmin)) => Ok(CanonicalRole::Superadmin),
            Some(other) => Err(SuperAdminError::Unauthorized(format!(
                "Account role '{}' is not SUPERADMIN",
                other.as_str()
            ))
            .log()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SuperAdminLoginResponse {
    pub token: String,
    pub superadmin: SuperAdmin,
}

#[derive(Debug, Deserialize)]
pub struct SuperAdminMeResponse {
    pub superadmin: SuperAdmin,
}

/// Observable state of the superadmin console session.
#[derive(Clone, Debug, PartialEq)]
pub enum SuperAdminState {
    Booting,
    Authenticated(SuperAdmin),
    Unauthenticated,
}

impl SuperAdminState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Booting)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn account(&self) -> Option<&SuperAdmin> {
        match self {
            Self::Authenticated(account) => Some(account),
            _ => None,
        }
    }

    /// View the console state as a portal session state, so superadmin
    /// routes go through the same guard decisions as every other portal.
    pub fn as_session_state(&self) -> SessionState {
        match self {
            Self::Booting => SessionState::Booting,
            Self::Unauthenticated => SessionState::Unauthenticated,
            Self::Authenticated(account) => SessionState::Authenticated(SessionUser {
                id: account.id.clone(),
                email: account.email.clone(),
                display_name: account
                    .display_name
                    .clone()
                    .unwrap_or_else(|| account.email.clone()),
                role: CanonicalRole::Superadmin,
                avatar_url: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(role: Option<&str>) -> SuperAdmin {
        SuperAdmin {
            id: "sa-1".to_string(),
            email: "root@example.com".to_string(),
            display_name: None,
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn test_verified_role_accepts_superadmin_and_aliases() {
        assert!(account(Some("SUPERADMIN")).verified_role().is_ok());
        assert!(account(Some("super_admin")).verified_role().is_ok());
        assert!(account(Some("godmode")).verified_role().is_ok());
    }

    #[test]
    fn test_verified_role_trusts_missing_field() {
        assert_eq!(
            account(None).verified_role().ok(),
            Some(CanonicalRole::Superadmin)
        );
        assert_eq!(
            account(Some("  ")).verified_role().ok(),
            Some(CanonicalRole::Superadmin)
        );
    }

    #[test]
    fn test_console_state_feeds_the_route_guard() {
        use crate::guard::{GuardDecision, evaluate};
        use crate::role::PortalFamily;

        let state = SuperAdminState::Authenticated(account(Some("SUPERADMIN")));
        let decision = evaluate(&state.as_session_state(), &[], PortalFamily::SuperAdmin);
        assert!(
            matches!(decision, GuardDecision::Allow(user) if user.role == CanonicalRole::Superadmin)
        );

        let decision = evaluate(
            &SuperAdminState::Unauthenticated.as_session_state(),
            &[],
            PortalFamily::SuperAdmin,
        );
        assert_eq!(
            decision,
            GuardDecision::RedirectToLogin("/superadmin/login".to_string())
        );

        // A display name falls back to the email when the API omits it
        let state = SuperAdminState::Authenticated(account(None)).as_session_state();
        assert_eq!(
            state.user().map(|u| u.display_name.as_str()),
            Some("root@example.com")
        );
    }

    #[test]
    fn test_verified_role_rejects_other_roles() {
        assert!(matches!(
            account(Some("ADMIN")).verified_role(),
            Err(SuperAdminError::Unauthorized(_))
        ));
        assert!(matches!(
            account(Some("intern")).verified_role(),
            Err(SuperAdminError::Unauthorized(_))
        ));
    }
}
