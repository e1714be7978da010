use thiserror::Error;

use crate::provider::AuthProviderError;
use crate::resolver::ResolverError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Credentials were valid but no eligible profile exists for this portal.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Resolver error: {0}")]
    Resolver(String),
}

impl SessionError {
    pub fn log(self) -> Self {
        match &self {
            Self::InvalidCredentials => tracing::info!("Session error: {}", self),
            Self::Unauthorized(_) => tracing::warn!("Session error: {}", self),
            _ => tracing::error!("Session error: {}", self),
        }
        self
    }

    /// A message safe to show to the end user. Deliberately does not
    /// distinguish bad credentials from a missing or ineligible profile.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials | Self::Unauthorized(_) => "Invalid email or password",
            Self::Provider(_) | Self::Resolver(_) => "Sign-in is temporarily unavailable",
        }
    }
}

impl From<AuthProviderError> for SessionError {
    fn from(err: AuthProviderError) -> Self {
        match err {
            AuthProviderError::InvalidCredentials => Self::InvalidCredentials.log(),
            other => Self::Provider(other.to_string()).log(),
        }
    }
}

impl From<ResolverError> for SessionError {
    fn from(err: ResolverError) -> Self {
        match err {
            ResolverError::ProfileNotFound
            | ResolverError::UnauthorizedRole { .. }
            | ResolverError::InactiveProfile { .. } => Self::Unauthorized(err.to_string()).log(),
            other => Self::Resolver(other.to_string()).log(),
        }
    }
}
