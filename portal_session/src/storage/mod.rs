mod config;
mod errors;
mod types;

pub(crate) use config::{DATA_STORE, DB_TABLE_PREFIX};
pub use errors::StorageError;

/// Touch the lazily-initialized data store so misconfiguration fails at startup
/// rather than on the first lookup.
pub(crate) async fn init() -> Result<(), StorageError> {
    let _ = *DATA_STORE;

    Ok(())
}
