use async_trait::async_trait;

use crate::profile::{Profile, ProfileError, ProfileStore};
use crate::provider::Identity;
use crate::role::PortalFamily;

/// One candidate source of a profile for an identity.
///
/// Sources are queried in priority order by the resolver; a source answers
/// `Ok(None)` when it simply has no match and `Err` when it could not be
/// consulted at all.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn lookup(&self, identity: &Identity) -> Result<Option<Profile>, ProfileError>;
}

/// Primary key join: profile claimed by this identity.
pub struct IdentityIdSource {
    portal: PortalFamily,
}

impl IdentityIdSource {
    pub fn new(portal: PortalFamily) -> Self {
        Self { portal }
    }
}

#[async_trait]
impl ProfileSource for IdentityIdSource {
    fn name(&self) -> &'static str {
        "identity_id"
    }

    async fn lookup(&self, identity: &Identity) -> Result<Option<Profile>, ProfileError> {
        ProfileStore::get_by_identity_id(self.portal, &identity.id).await
    }
}

/// Email fallback for rows created before the identity reference existed,
/// under the scoped row policy.
pub struct ScopedEmailSource {
    portal: PortalFamily,
}

impl ScopedEmailSource {
    pub fn new(portal: PortalFamily) -> Self {
        Self { portal }
    }
}

#[async_trait]
impl ProfileSource for ScopedEmailSource {
    fn name(&self) -> &'static str {
        "scoped_email"
    }

    async fn lookup(&self, identity: &Identity) -> Result<Option<Profile>, ProfileError> {
        ProfileStore::get_by_email_scoped(self.portal, &identity.email, &identity.id).await
    }
}

/// Elevated last-resort source.
///
/// Looks up by identity id, then by lenient email match, and back-fills the
/// identity reference on an email hit so the next resolution succeeds at the
/// primary source. The back-fill is the only mutation in the whole
/// resolution chain and is idempotent.
pub struct PrivilegedSource {
    portal: PortalFamily,
}

impl PrivilegedSource {
    pub fn new(portal: PortalFamily) -> Self {
        Self { portal }
    }
}

#[async_trait]
impl ProfileSource for PrivilegedSource {
    fn name(&self) -> &'static str {
        "privileged"
    }

    async fn lookup(&self, identity: &Identity) -> Result<Option<Profile>, ProfileError> {
        if let Some(profile) = ProfileStore::get_by_identity_id(self.portal, &identity.id).await? {
            return Ok(Some(profile));
        }

        let Some(mut profile) =
            ProfileStore::get_by_email_privileged(self.portal, &identity.email, &identity.id)
                .await?
        else {
            return Ok(None);
        };

        if profile.identity_id.as_deref() != Some(identity.id.as_str()) {
            let linked =
                ProfileStore::link_identity(self.portal, &profile.id, &identity.id).await?;
            if linked {
                profile.identity_id = Some(identity.id.clone());
                tracing::info!(
                    profile_id = %profile.id,
                    "Back-filled identity reference from privileged lookup"
                );
            }
        }

        Ok(Some(profile))
    }
}
