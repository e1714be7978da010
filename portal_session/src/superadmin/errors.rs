use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuperAdminError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SuperAdminError {
    pub fn log(self) -> Self {
        match &self {
            Self::InvalidCredentials => tracing::info!("SuperAdmin error: {}", self),
            Self::Unauthorized(_) => tracing::warn!("SuperAdmin error: {}", self),
            _ => tracing::error!("SuperAdmin error: {}", self),
        }
        self
    }

    /// A message safe to show to the end user. Wrong password and
    /// wrong-account-kind are indistinguishable on purpose; the detailed
    /// cause stays in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials | Self::Unauthorized(_) => "Invalid email or password",
            Self::Network(_) | Self::Api(_) | Self::Config(_) => {
                "Sign-in is temporarily unavailable"
            }
        }
    }
}
