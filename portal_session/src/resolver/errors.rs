use thiserror::Error;

use crate::profile::ProfileError;

/// Errors surfaced by multi-source profile resolution.
///
/// Per-source failures are swallowed inside the resolver (the next source is
/// tried); only the terminal outcomes below reach the caller.
#[derive(Debug, Error, Clone)]
pub enum ResolverError {
    /// Every source was exhausted without a match.
    #[error("Profile not found")]
    ProfileNotFound,

    /// A profile was found but its role is not eligible for the portal.
    #[error("Role not eligible for portal: {role}")]
    UnauthorizedRole { role: String },

    /// A profile was found but its status bars it from signing in.
    #[error("Profile not active: {status}")]
    InactiveProfile { status: String },

    /// The final mandatory source failed.
    #[error("Network error: {0}")]
    Network(String),

    /// Error from profile storage operations.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ResolverError {
    /// Log the error and return self, allowing method chaining at throw sites.
    pub fn log(self) -> Self {
        match &self {
            Self::ProfileNotFound => tracing::error!("Profile not found"),
            Self::UnauthorizedRole { role } => {
                tracing::error!(role = %role, "Role not eligible for portal")
            }
            Self::InactiveProfile { status } => {
                tracing::error!(status = %status, "Profile not active")
            }
            Self::Network(msg) => tracing::error!("Network error: {}", msg),
            Self::Storage(msg) => tracing::error!("Storage error: {}", msg),
        }
        self
    }
}

impl From<ProfileError> for ResolverError {
    fn from(err: ProfileError) -> Self {
        let error = Self::Storage(err.to_string());
        tracing::error!("{}", error);
        error
    }
}
