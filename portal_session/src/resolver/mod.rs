//! Ordered multi-source profile resolution.
//!
//! Turns an authenticated [`Identity`] into the portal's [`Profile`] by
//! consulting sources in priority order: the identity-id join, the scoped
//! email fallback, then the privileged source which also repairs the missing
//! identity reference. A failing non-final source is treated as "found
//! nothing"; only a failure at the final source is fatal, and only when the
//! caller requires a profile.

mod errors;
mod sources;

pub use errors::ResolverError;
pub use sources::{IdentityIdSource, PrivilegedSource, ProfileSource, ScopedEmailSource};

use crate::profile::Profile;
use crate::provider::Identity;
use crate::role::{CanonicalRole, NormalizedRole, PortalFamily, normalize};

/// A resolved profile together with the source that produced it.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub profile: Profile,
    /// Name of the source that answered, for logs and diagnostics.
    pub source: &'static str,
    pub role: CanonicalRole,
}

pub struct ProfileResolver {
    portal: PortalFamily,
    sources: Vec<Box<dyn ProfileSource>>,
}

impl ProfileResolver {
    /// The default source chain for a portal: id → email → privileged.
    pub fn for_portal(portal: PortalFamily) -> Self {
        Self {
            portal,
            sources: vec![
                Box::new(IdentityIdSource::new(portal)),
                Box::new(ScopedEmailSource::new(portal)),
                Box::new(PrivilegedSource::new(portal)),
            ],
        }
    }

    /// A resolver with substitute sources. The order given is the priority
    /// order; the last source is the mandatory one.
    pub fn with_sources(portal: PortalFamily, sources: Vec<Box<dyn ProfileSource>>) -> Self {
        Self { portal, sources }
    }

    pub fn portal(&self) -> PortalFamily {
        self.portal
    }

    /// Resolve the identity to a profile eligible for this portal.
    ///
    /// With `required` set, exhaustion is `ProfileNotFound`, an ineligible
    /// role is `UnauthorizedRole`, and a failing final source is `Network`;
    /// without it all three collapse to `Ok(None)`.
    pub async fn resolve(
        &self,
        identity: &Identity,
        required: bool,
    ) -> Result<Option<Resolution>, ResolverError> {
        let total = self.sources.len();

        for (index, source) in self.sources.iter().enumerate() {
            let is_final = index + 1 == total;

            match source.lookup(identity).await {
                Ok(Some(profile)) => {
                    tracing::debug!(
                        source = source.name(),
                        profile_id = %profile.id,
                        "Profile source answered"
                    );
                    return self.check_eligibility(profile, source.name(), required);
                }
                Ok(None) => {
                    tracing::debug!(source = source.name(), "Profile source found nothing");
                }
                Err(e) if is_final && required => {
                    return Err(ResolverError::Network(e.to_string()).log());
                }
                Err(e) => {
                    tracing::warn!(
                        source = source.name(),
                        error = %e,
                        "Profile source failed, falling through to next"
                    );
                }
            }

            // A contradicting role hint after the primary miss means this
            // identity belongs to another portal family: skip the remaining
            // sources rather than risk matching an unrelated profile by
            // email collision.
            if index == 0 && self.hint_contradicts_portal(identity) {
                tracing::debug!(
                    portal = %self.portal,
                    hint = ?identity.role_hint,
                    "Role hint contradicts portal, aborting resolution early"
                );
                return self.not_found(required);
            }
        }

        self.not_found(required)
    }

    fn hint_contradicts_portal(&self, identity: &Identity) -> bool {
        match normalize(identity.role_hint.as_deref()) {
            Some(NormalizedRole::Known(role)) => role.portal_family() != self.portal,
            // Unknown or absent hints prove nothing either way.
            _ => false,
        }
    }

    fn check_eligibility(
        &self,
        profile: Profile,
        source: &'static str,
        required: bool,
    ) -> Result<Option<Resolution>, ResolverError> {
        let role = match profile.canonical_role() {
            Some(NormalizedRole::Known(role)) if self.portal.allows(role) => role,
            other => {
                let raw = other.map(|r| r.as_str().to_string()).unwrap_or_default();
                if required {
                    return Err(ResolverError::UnauthorizedRole { role: raw }.log());
                }
                tracing::info!(role = %raw, portal = %self.portal, "Resolved profile role not eligible");
                return Ok(None);
            }
        };

        if !profile.is_active() {
            let status = profile.status().to_string();
            if required {
                return Err(ResolverError::InactiveProfile { status }.log());
            }
            tracing::info!(status = %status, "Resolved profile not active");
            return Ok(None);
        }

        Ok(Some(Resolution {
            profile,
            source,
            role,
        }))
    }

    fn not_found(&self, required: bool) -> Result<Option<Resolution>, ResolverError> {
        if required {
            Err(ResolverError::ProfileNotFound.log())
        } else {
            Ok(None)
        }
    }
}
