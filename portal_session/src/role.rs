//! Canonical roles, the role normalizer, and the portal taxonomy.
//!
//! Role strings arrive from loosely-typed stores (relational rows, provider
//! metadata, RPC responses) in mixed casings and with known misspellings.
//! Everything downstream of [`normalize`] works with the closed
//! [`CanonicalRole`] set; raw strings never reach the route guard.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of application roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CanonicalRole {
    Buyer,
    Vendor,
    Admin,
    Hr,
    Finance,
    DataEntry,
    Support,
    Sales,
    Superadmin,
}

impl CanonicalRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "BUYER",
            Self::Vendor => "VENDOR",
            Self::Admin => "ADMIN",
            Self::Hr => "HR",
            Self::Finance => "FINANCE",
            Self::DataEntry => "DATA_ENTRY",
            Self::Support => "SUPPORT",
            Self::Sales => "SALES",
            Self::Superadmin => "SUPERADMIN",
        }
    }

    /// The portal family this role signs in through.
    pub fn portal_family(&self) -> PortalFamily {
        match self {
            Self::Buyer => PortalFamily::Buyer,
            Self::Vendor => PortalFamily::Vendor,
            Self::Superadmin => PortalFamily::SuperAdmin,
            _ => PortalFamily::Internal,
        }
    }

    /// Dashboard home for an authenticated user with this role, if one is
    /// defined. The route guard falls back to `/unauthorized` for roles
    /// without a home.
    pub fn home_route(&self) -> Option<&'static str> {
        match self {
            Self::Buyer => Some("/buyer"),
            Self::Vendor => Some("/vendor"),
            Self::Admin => Some("/admin"),
            Self::Hr => Some("/hr"),
            Self::Finance => Some("/finance"),
            Self::DataEntry => Some("/data-entry"),
            Self::Support => Some("/support"),
            Self::Sales => Some("/sales"),
            Self::Superadmin => Some("/superadmin"),
        }
    }

    /// Back-office roles handled by the internal portal.
    pub fn is_internal(&self) -> bool {
        self.portal_family() == PortalFamily::Internal
    }
}

impl fmt::Display for CanonicalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUYER" => Ok(Self::Buyer),
            "VENDOR" => Ok(Self::Vendor),
            "ADMIN" => Ok(Self::Admin),
            "HR" => Ok(Self::Hr),
            "FINANCE" => Ok(Self::Finance),
            "DATA_ENTRY" => Ok(Self::DataEntry),
            "SUPPORT" => Ok(Self::Support),
            "SALES" => Ok(Self::Sales),
            "SUPERADMIN" => Ok(Self::Superadmin),
            _ => Err(()),
        }
    }
}

/// Result of normalizing a raw role string.
///
/// Unrecognized non-empty strings survive uppercased as [`Unknown`] so the
/// allow-list check downstream rejects them; they are never coerced to a role
/// that would grant access.
///
/// [`Unknown`]: NormalizedRole::Unknown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedRole {
    Known(CanonicalRole),
    Unknown(String),
}

impl NormalizedRole {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(role) => role.as_str(),
            Self::Unknown(raw) => raw,
        }
    }

    pub fn known(&self) -> Option<CanonicalRole> {
        match self {
            Self::Known(role) => Some(*role),
            Self::Unknown(_) => None,
        }
    }
}

impl fmt::Display for NormalizedRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a free-form role string to its normalized form.
///
/// Trims and upper-cases the input, corrects known aliases and misspellings,
/// and returns `None` for absent or empty input. Pure and idempotent:
/// `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: Option<&str>) -> Option<NormalizedRole> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }

    let upper = trimmed.to_uppercase();
    // Alias and misspelling corrections observed in stored data.
    let corrected = match upper.as_str() {
        "DATAENTRY" | "DATA-ENTRY" | "DATA ENTRY" => "DATA_ENTRY",
        "FINACE" | "FINANACE" => "FINANCE",
        "SUPERUSER" | "GODMODE" | "SUPER_ADMIN" | "SUPER-ADMIN" => "SUPERADMIN",
        "HUMANRESOURCES" | "HUMAN_RESOURCES" => "HR",
        other => other,
    };

    match CanonicalRole::from_str(corrected) {
        Ok(role) => Some(NormalizedRole::Known(role)),
        Err(_) => Some(NormalizedRole::Unknown(corrected.to_string())),
    }
}

/// The four portal families a session context can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortalFamily {
    Buyer,
    Vendor,
    Internal,
    SuperAdmin,
}

impl PortalFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Vendor => "vendor",
            Self::Internal => "internal",
            Self::SuperAdmin => "superadmin",
        }
    }

    /// Roles eligible to hold a session on this portal.
    pub fn allowed_roles(&self) -> &'static [CanonicalRole] {
        match self {
            Self::Buyer => &[CanonicalRole::Buyer],
            Self::Vendor => &[CanonicalRole::Vendor],
            Self::Internal => &[
                CanonicalRole::Admin,
                CanonicalRole::Hr,
                CanonicalRole::Finance,
                CanonicalRole::DataEntry,
                CanonicalRole::Support,
                CanonicalRole::Sales,
            ],
            Self::SuperAdmin => &[CanonicalRole::Superadmin],
        }
    }

    pub fn allows(&self, role: CanonicalRole) -> bool {
        self.allowed_roles().contains(&role)
    }

    /// Login route for this portal.
    pub fn login_route(&self) -> &'static str {
        match self {
            Self::Buyer => "/buyer/login",
            Self::Vendor => "/vendor/login",
            Self::Internal => "/internal/login",
            Self::SuperAdmin => "/superadmin/login",
        }
    }
}

impl fmt::Display for PortalFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
