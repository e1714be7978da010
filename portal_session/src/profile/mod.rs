//! Profile rows and their dual-backend storage.
//!
//! A profile is the role-specific business record (buyer, vendor, employee)
//! keyed by a nullable reference to the identity provider's account id, with
//! email as the fallback key for rows created before the reference existed.
//! This module only reads and back-fills that reference; profile creation and
//! editing belong to the registration/admin flows.

mod errors;
mod storage;
mod types;

pub use errors::ProfileError;
pub use storage::ProfileStore;
pub use types::{Profile, ProfileStatus};

pub(crate) async fn init() -> Result<(), ProfileError> {
    ProfileStore::init().await
}
