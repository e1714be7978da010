//! Identity provider abstraction.
//!
//! The identity provider is an external collaborator: it owns credentials and
//! issues [`Identity`] values; this crate only consumes its sessions and its
//! auth-change event stream. [`HttpIdentityProvider`] adapts a hosted auth
//! API; tests substitute their own implementation.

mod errors;
mod http;
mod types;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;
use tokio::sync::broadcast;

pub use errors::AuthProviderError;
pub use http::HttpIdentityProvider;
pub use types::{AuthChange, AuthEvent, Credentials, Identity, ProviderSession};

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticate with email and password, establishing a provider session.
    async fn sign_in_with_password(
        &self,
        credentials: Credentials,
    ) -> Result<ProviderSession, AuthProviderError>;

    /// Invalidate the current provider session, if any.
    async fn sign_out(&self) -> Result<(), AuthProviderError>;

    /// The currently established provider session, if any.
    async fn get_session(&self) -> Result<Option<ProviderSession>, AuthProviderError>;

    /// Change the password of the currently signed-in identity.
    async fn update_password(&self, current: &str, new: &str) -> Result<(), AuthProviderError>;

    /// Subscribe to auth state changes (SIGNED_IN, SIGNED_OUT, TOKEN_REFRESHED).
    fn subscribe(&self) -> broadcast::Receiver<AuthChange>;
}
