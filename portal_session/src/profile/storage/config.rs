//! Profile table naming

use std::{env, sync::LazyLock};

use crate::profile::errors::ProfileError;
use crate::role::PortalFamily;
use crate::storage::DB_TABLE_PREFIX;

/// Buyer profiles table name
pub(crate) static DB_TABLE_BUYERS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_BUYERS").unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "buyers"))
});

/// Vendor profiles table name
pub(crate) static DB_TABLE_VENDORS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_VENDORS").unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "vendors"))
});

/// Internal employee profiles table name
pub(crate) static DB_TABLE_EMPLOYEES: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_EMPLOYEES")
        .unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "employees"))
});

/// Profile table backing a portal family. SuperAdmin sessions are token-based
/// and have no profile table.
pub(crate) fn profile_table(portal: PortalFamily) -> Result<&'static str, ProfileError> {
    match portal {
        PortalFamily::Buyer => Ok(DB_TABLE_BUYERS.as_str()),
        PortalFamily::Vendor => Ok(DB_TABLE_VENDORS.as_str()),
        PortalFamily::Internal => Ok(DB_TABLE_EMPLOYEES.as_str()),
        PortalFamily::SuperAdmin => Err(ProfileError::NoTable(portal.to_string())),
    }
}

pub(super) const ALL_PORTAL_TABLES: [PortalFamily; 3] = [
    PortalFamily::Buyer,
    PortalFamily::Vendor,
    PortalFamily::Internal,
];
