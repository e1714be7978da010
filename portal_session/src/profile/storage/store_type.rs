use crate::profile::{errors::ProfileError, types::Profile};
use crate::role::PortalFamily;
use crate::storage::DATA_STORE;

use super::config::{ALL_PORTAL_TABLES, profile_table};
use super::postgres::*;
use super::sqlite::*;

/// Façade over the per-backend profile queries.
///
/// All lookups are scoped to one portal family's table; the privileged email
/// variant and `link_identity` exist for the elevated resolver source only.
pub struct ProfileStore;

impl ProfileStore {
    /// Create the profile tables for every portal family (idempotent).
    pub(crate) async fn init() -> Result<(), ProfileError> {
        let store = DATA_STORE.lock().await;

        for portal in ALL_PORTAL_TABLES {
            let table = profile_table(portal)?;
            match (store.as_sqlite(), store.as_postgres()) {
                (Some(pool), _) => create_table_sqlite(pool, table).await?,
                (_, Some(pool)) => create_table_postgres(pool, table).await?,
                _ => return Err(ProfileError::Storage("Unsupported database type".to_string())),
            }
        }

        Ok(())
    }

    /// Primary lookup: profile claimed by this identity.
    #[tracing::instrument(fields(portal = %portal, identity_id = %identity_id))]
    pub(crate) async fn get_by_identity_id(
        portal: PortalFamily,
        identity_id: &str,
    ) -> Result<Option<Profile>, ProfileError> {
        let table = profile_table(portal)?;
        let store = DATA_STORE.lock().await;

        let result = if let Some(pool) = store.as_sqlite() {
            get_by_identity_id_sqlite(pool, table, identity_id).await
        } else if let Some(pool) = store.as_postgres() {
            get_by_identity_id_postgres(pool, table, identity_id).await
        } else {
            Err(ProfileError::Storage("Unsupported database type".to_string()))
        };

        log_lookup(&result);
        result
    }

    /// Email fallback under the scoped (row-level-security analogue) policy:
    /// exact email match, unclaimed rows or rows claimed by this identity.
    #[tracing::instrument(fields(portal = %portal, identity_id = %identity_id))]
    pub(crate) async fn get_by_email_scoped(
        portal: PortalFamily,
        email: &str,
        identity_id: &str,
    ) -> Result<Option<Profile>, ProfileError> {
        let table = profile_table(portal)?;
        let store = DATA_STORE.lock().await;

        let result = if let Some(pool) = store.as_sqlite() {
            get_by_email_scoped_sqlite(pool, table, email, identity_id).await
        } else if let Some(pool) = store.as_postgres() {
            get_by_email_scoped_postgres(pool, table, email, identity_id).await
        } else {
            Err(ProfileError::Storage("Unsupported database type".to_string()))
        };

        log_lookup(&result);
        result
    }

    /// Elevated email fallback: case-insensitive match, same claim constraint.
    #[tracing::instrument(fields(portal = %portal, identity_id = %identity_id))]
    pub(crate) async fn get_by_email_privileged(
        portal: PortalFamily,
        email: &str,
        identity_id: &str,
    ) -> Result<Option<Profile>, ProfileError> {
        let table = profile_table(portal)?;
        let store = DATA_STORE.lock().await;

        let result = if let Some(pool) = store.as_sqlite() {
            get_by_email_privileged_sqlite(pool, table, email, identity_id).await
        } else if let Some(pool) = store.as_postgres() {
            get_by_email_privileged_postgres(pool, table, email, identity_id).await
        } else {
            Err(ProfileError::Storage("Unsupported database type".to_string()))
        };

        log_lookup(&result);
        result
    }

    /// Back-fill the identity reference on a profile discovered by a fallback
    /// key. Safe to call repeatedly; a row claimed by another identity is
    /// never overwritten. Returns whether the reference is now in place.
    #[tracing::instrument(fields(portal = %portal, profile_id = %profile_id, identity_id = %identity_id))]
    pub(crate) async fn link_identity(
        portal: PortalFamily,
        profile_id: &str,
        identity_id: &str,
    ) -> Result<bool, ProfileError> {
        let table = profile_table(portal)?;
        let store = DATA_STORE.lock().await;

        let linked = if let Some(pool) = store.as_sqlite() {
            link_identity_sqlite(pool, table, profile_id, identity_id).await
        } else if let Some(pool) = store.as_postgres() {
            link_identity_postgres(pool, table, profile_id, identity_id).await
        } else {
            Err(ProfileError::Storage("Unsupported database type".to_string()))
        }?;

        tracing::info!(linked, "Identity reference sync completed");
        Ok(linked)
    }

    /// Create or update a profile. Used by registration/admin flows and tests.
    #[tracing::instrument(skip(profile), fields(portal = %portal, profile_id = %profile.id))]
    pub async fn upsert_profile(
        portal: PortalFamily,
        profile: Profile,
    ) -> Result<Profile, ProfileError> {
        let table = profile_table(portal)?;
        let store = DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            upsert_profile_sqlite(pool, table, profile).await
        } else if let Some(pool) = store.as_postgres() {
            upsert_profile_postgres(pool, table, profile).await
        } else {
            Err(ProfileError::Storage("Unsupported database type".to_string()))
        }
    }

    pub async fn delete_profile(portal: PortalFamily, id: &str) -> Result<(), ProfileError> {
        let table = profile_table(portal)?;
        let store = DATA_STORE.lock().await;

        if let Some(pool) = store.as_sqlite() {
            delete_profile_sqlite(pool, table, id).await
        } else if let Some(pool) = store.as_postgres() {
            delete_profile_postgres(pool, table, id).await
        } else {
            Err(ProfileError::Storage("Unsupported database type".to_string()))
        }
    }
}

fn log_lookup(result: &Result<Option<Profile>, ProfileError>) {
    match result {
        Ok(Some(_)) => tracing::info!(found = true, "Profile lookup completed"),
        Ok(None) => tracing::info!(found = false, "Profile lookup completed - not found"),
        Err(e) => tracing::error!(error = %e, "Profile lookup failed"),
    }
}
