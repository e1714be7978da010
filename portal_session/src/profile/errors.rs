use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ProfileError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("No profile table for portal: {0}")]
    NoTable(String),
}
