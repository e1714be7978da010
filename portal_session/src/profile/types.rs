use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::role::{NormalizedRole, normalize};

/// A role-specific business record as stored.
///
/// `role` and `status` are kept as the free-form strings the store holds;
/// the parsed accessors apply normalization at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Profile {
    /// Unique profile identifier
    pub id: String,
    /// Reference to the identity provider account, unset for pre-migration rows
    pub identity_id: Option<String>,
    /// Contact email, used as the fallback lookup key
    pub email: String,
    /// Display name
    pub display_name: String,
    /// Role as stored (free-form string)
    pub role: String,
    /// Account status as stored (ACTIVE, SUSPENDED, ...)
    pub status: String,
    /// Avatar image URL
    pub avatar_url: Option<String>,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Create a new ACTIVE profile with fresh timestamps.
    pub fn new(id: String, email: String, display_name: String, role: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            identity_id: None,
            email,
            display_name,
            role,
            status: ProfileStatus::Active.to_string(),
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The stored role passed through the normalizer.
    pub fn canonical_role(&self) -> Option<NormalizedRole> {
        normalize(Some(&self.role))
    }

    pub fn status(&self) -> ProfileStatus {
        self.status.trim().to_uppercase().parse().unwrap_or_else(|_| {
            ProfileStatus::Other(self.status.trim().to_uppercase())
        })
    }

    pub fn is_active(&self) -> bool {
        self.status() == ProfileStatus::Active
    }
}

/// Parsed profile status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileStatus {
    Active,
    Suspended,
    Pending,
    Disabled,
    Other(String),
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("ACTIVE"),
            Self::Suspended => f.write_str("SUSPENDED"),
            Self::Pending => f.write_str("PENDING"),
            Self::Disabled => f.write_str("DISABLED"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

impl std::str::FromStr for ProfileStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "SUSPENDED" => Ok(Self::Suspended),
            "PENDING" => Ok(Self::Pending),
            "DISABLED" => Ok(Self::Disabled),
            _ => Err(()),
        }
    }
}
