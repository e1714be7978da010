use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum AuthProviderError {
    /// The provider rejected the supplied credentials.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The provider could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with an unexpected response.
    #[error("Provider error: {0}")]
    Provider(String),
}
