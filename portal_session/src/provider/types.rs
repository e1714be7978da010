use serde::{Deserialize, Serialize};
use std::fmt;

/// The authentication-provider-level account.
///
/// Opaque id plus email, with optional metadata hints. Created by the
/// provider at signup; this crate never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    /// Free-form role hint from provider metadata, if present. A hint is
    /// advisory: it can short-circuit resolution but never grants a role.
    #[serde(default)]
    pub role_hint: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// An established session with the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderSession {
    pub identity: Identity,
    pub access_token: String,
}

/// Auth state change events consumed from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

impl fmt::Display for AuthEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignedIn => f.write_str("SIGNED_IN"),
            Self::SignedOut => f.write_str("SIGNED_OUT"),
            Self::TokenRefreshed => f.write_str("TOKEN_REFRESHED"),
        }
    }
}

/// An auth event paired with the session it refers to.
#[derive(Debug, Clone)]
pub struct AuthChange {
    pub event: AuthEvent,
    pub session: Option<ProviderSession>,
}

/// Email/password credentials. `Debug` redacts the password.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("a@example.com", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("a@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_auth_event_display() {
        assert_eq!(AuthEvent::SignedIn.to_string(), "SIGNED_IN");
        assert_eq!(AuthEvent::SignedOut.to_string(), "SIGNED_OUT");
        assert_eq!(AuthEvent::TokenRefreshed.to_string(), "TOKEN_REFRESHED");
    }

    #[test]
    fn test_identity_deserializes_without_hints() {
        let identity: Identity =
            serde_json::from_str(r#"{"id":"id-1","email":"x@example.com"}"#)
                .expect("Failed to deserialize");
        assert_eq!(identity.role_hint, None);
        assert_eq!(identity.avatar_url, None);
    }
}
