//! Shared test environment setup.

use std::env;
use std::sync::Once;

use crate::profile::ProfileStore;

static INIT: Once = Once::new();

/// Point the data store at a temp-dir SQLite file and create the portal
/// tables. Safe to call from every test; the environment is only set up
/// once per process.
pub(crate) async fn init_test_environment() {
    INIT.call_once(|| {
        // Prefer .env_test, fall back to .env, tolerate neither
        if dotenvy::from_filename(".env_test").is_err() {
            let _ = dotenvy::dotenv();
        }

        if env::var("PORTAL_DATA_STORE_TYPE").is_err() {
            let db_path = env::temp_dir().join(format!(
                "portal_session_test_{}.db",
                std::process::id()
            ));
            if db_path.exists() {
                if let Err(e) = std::fs::remove_file(&db_path) {
                    eprintln!("Warning: could not remove stale test database: {e}");
                }
            }
            unsafe {
                env::set_var("PORTAL_DATA_STORE_TYPE", "sqlite");
                env::set_var(
                    "PORTAL_DATA_STORE_URL",
                    format!("sqlite:{}", db_path.display()),
                );
            }
        }
    });

    if let Err(e) = ProfileStore::init().await {
        eprintln!("Warning: test table init failed: {e}");
    }
}
