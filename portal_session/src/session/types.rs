use serde::{Deserialize, Serialize};

use crate::resolver::Resolution;
use crate::role::CanonicalRole;

/// The user attached to an authenticated session, trimmed to what the
/// portals render and authorize on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: CanonicalRole,
    pub avatar_url: Option<String>,
}

impl SessionUser {
    /// Session users come from resolved, eligibility-checked profiles; the
    /// canonical role is the one the resolver verified, never re-parsed from
    /// the stored string.
    pub fn from_resolution(resolution: &Resolution) -> Self {
        Self {
            id: resolution.profile.id.clone(),
            email: resolution.profile.email.clone(),
            display_name: resolution.profile.display_name.clone(),
            role: resolution.role,
            avatar_url: resolution.profile.avatar_url.clone(),
        }
    }
}

/// Observable authentication state of a portal session.
///
/// Starts at `Booting` and settles into one of the terminal variants once
/// the initial provider session check and profile resolution complete.
/// Later auth events move it between the terminal variants.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    Booting,
    Authenticated(SessionUser),
    Unauthenticated,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Booting)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<CanonicalRole> {
        self.user().map(|u| u.role)
    }
}
