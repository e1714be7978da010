//! Authentication and session resolution for multi-portal marketplaces.
//!
//! A marketplace runs several portals against one identity provider: buyers,
//! vendors, internal back-office staff, and a separate superadmin console.
//! This crate turns a provider identity into a portal-scoped, role-checked
//! session:
//!
//! - [`role`]: canonical roles, the normalizer for messy stored role
//!   strings, and the portal family taxonomy.
//! - [`Profile`] storage over SQLite or Postgres, one table per portal
//!   family.
//! - [`ProfileResolver`]: ordered multi-source resolution from identity id,
//!   scoped email, and a privileged lookup that repairs missing identity
//!   references.
//! - [`SessionContext`]: per-portal session state machine with
//!   last-event-wins ordering over the provider's auth event stream.
//! - [`guard::evaluate`]: pure route-guard decisions.
//! - [`superadmin`]: the bearer-token console session.
//!
//! Call [`init`] once at startup to connect storage and create tables, then
//! build one [`SessionContext`] per portal the host serves.

mod config;
pub mod guard;
mod profile;
mod provider;
mod resolver;
mod role;
mod session;
mod storage;
mod superadmin;

#[cfg(test)]
mod test_utils;

pub use config::PORTAL_ROUTE_PREFIX;
pub use guard::{GuardDecision, evaluate};
pub use profile::{Profile, ProfileError, ProfileStatus, ProfileStore};
pub use provider::{
    AuthChange, AuthEvent, AuthProviderError, Credentials, HttpIdentityProvider, Identity,
    IdentityProvider, ProviderSession,
};
pub use resolver::{
    IdentityIdSource, PrivilegedSource, ProfileResolver, ProfileSource, Resolution, ResolverError,
    ScopedEmailSource,
};
pub use role::{CanonicalRole, NormalizedRole, PortalFamily, normalize};
pub use session::{SessionContext, SessionError, SessionState, SessionUser};
pub use storage::StorageError;
pub use superadmin::{
    MemoryTokenStore, SuperAdmin, SuperAdminApi, SuperAdminClient, SuperAdminError,
    SuperAdminLoginResponse, SuperAdminMeResponse, SuperAdminSession, SuperAdminState, TokenStore,
};

/// Connect the configured data store and create the portal profile tables.
pub async fn init() -> Result<(), ProfileError> {
    storage::init()
        .await
        .map_err(|e| ProfileError::Storage(e.to_string()))?;
    profile::init().await?;
    tracing::info!("portal-session initialized");
    Ok(())
}
