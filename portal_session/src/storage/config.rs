//! Data store selection and table naming

use std::{env, str::FromStr, sync::LazyLock};
use tokio::sync::Mutex;

use super::types::{DataStore, PostgresDataStore, SqliteDataStore};

static PORTAL_DATA_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("PORTAL_DATA_STORE_TYPE").expect("PORTAL_DATA_STORE_TYPE must be set")
});

static PORTAL_DATA_STORE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("PORTAL_DATA_STORE_URL").expect("PORTAL_DATA_STORE_URL must be set")
});

pub(crate) static DATA_STORE: LazyLock<Mutex<Box<dyn DataStore>>> = LazyLock::new(|| {
    let store_type = PORTAL_DATA_STORE_TYPE.as_str();
    let store_url = PORTAL_DATA_STORE_URL.as_str();

    tracing::info!(
        "Initializing data store with type: {}, url: {}",
        store_type,
        store_url
    );

    let store = match store_type {
        "sqlite" => {
            let opts = sqlx::sqlite::SqliteConnectOptions::from_str(store_url)
                .expect("Failed to parse SQLite connection string")
                .create_if_missing(true);

            Box::new(SqliteDataStore {
                pool: sqlx::sqlite::SqlitePool::connect_lazy_with(opts),
            }) as Box<dyn DataStore>
        }
        "postgres" => Box::new(PostgresDataStore {
            pool: sqlx::PgPool::connect_lazy(store_url).expect("Failed to create Postgres pool"),
        }) as Box<dyn DataStore>,
        t => panic!(
            "Unsupported store type: {}. Supported types are 'sqlite' and 'postgres'",
            t
        ),
    };

    Mutex::new(store)
});

/// Table prefix for all portal profile tables
pub(crate) static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "mkt_".to_string()));
