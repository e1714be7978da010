use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::profile::{errors::ProfileError, types::Profile};

// SQLite implementations

pub(super) async fn create_table_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
) -> Result<(), ProfileError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY NOT NULL,
            identity_id TEXT,
            email TEXT NOT NULL,
            display_name TEXT NOT NULL,
            role TEXT NOT NULL,
            status TEXT NOT NULL,
            avatar_url TEXT,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
        table_name
    ))
    .execute(pool)
    .await
    .map_err(|e| ProfileError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn get_by_identity_id_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    identity_id: &str,
) -> Result<Option<Profile>, ProfileError> {
    sqlx::query_as::<_, Profile>(&format!(
        r#"
        SELECT * FROM {} WHERE identity_id = ?
        "#,
        table_name
    ))
    .bind(identity_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ProfileError::Storage(e.to_string()))
}

/// Scoped email fallback: only unclaimed rows or rows already claimed by this
/// identity are visible, mirroring the row-level policy of the hosted store.
pub(super) async fn get_by_email_scoped_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    email: &str,
    identity_id: &str,
) -> Result<Option<Profile>, ProfileError> {
    sqlx::query_as::<_, Profile>(&format!(
        r#"
        SELECT * FROM {} WHERE email = ? AND (identity_id IS NULL OR identity_id = ?)
        "#,
        table_name
    ))
    .bind(email)
    .bind(identity_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ProfileError::Storage(e.to_string()))
}

/// Privileged email lookup: case-insensitive match, same claim constraint.
pub(super) async fn get_by_email_privileged_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    email: &str,
    identity_id: &str,
) -> Result<Option<Profile>, ProfileError> {
    sqlx::query_as::<_, Profile>(&format!(
        r#"
        SELECT * FROM {} WHERE LOWER(email) = LOWER(?) AND (identity_id IS NULL OR identity_id = ?)
        "#,
        table_name
    ))
    .bind(email)
    .bind(identity_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ProfileError::Storage(e.to_string()))
}

/// Back-fill the identity reference. Refuses to steal a row already claimed
/// by another identity, which makes repeated calls idempotent.
pub(super) async fn link_identity_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    profile_id: &str,
    identity_id: &str,
) -> Result<bool, ProfileError> {
    let result = sqlx::query(&format!(
        r#"
        UPDATE {} SET identity_id = ?, updated_at = ?
        WHERE id = ? AND (identity_id IS NULL OR identity_id = ?)
        "#,
        table_name
    ))
    .bind(identity_id)
    .bind(Utc::now())
    .bind(profile_id)
    .bind(identity_id)
    .execute(pool)
    .await
    .map_err(|e| ProfileError::Storage(e.to_string()))?;

    Ok(result.rows_affected() > 0)
}

pub(super) async fn upsert_profile_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    profile: Profile,
) -> Result<Profile, ProfileError> {
    sqlx::query(&format!(
        r#"
        INSERT INTO {} (id, identity_id, email, display_name, role, status, avatar_url, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (id) DO UPDATE SET
            identity_id = excluded.identity_id,
            email = excluded.email,
            display_name = excluded.display_name,
            role = excluded.role,
            status = excluded.status,
            avatar_url = excluded.avatar_url,
            updated_at = excluded.updated_at
        "#,
        table_name
    ))
    .bind(&profile.id)
    .bind(&profile.identity_id)
    .bind(&profile.email)
    .bind(&profile.display_name)
    .bind(&profile.role)
    .bind(&profile.status)
    .bind(&profile.avatar_url)
    .bind(profile.created_at)
    .bind(profile.updated_at)
    .execute(pool)
    .await
    .map_err(|e| ProfileError::Storage(e.to_string()))?;

    Ok(profile)
}

pub(super) async fn delete_profile_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    id: &str,
) -> Result<(), ProfileError> {
    sqlx::query(&format!(
        r#"
        DELETE FROM {} WHERE id = ?
        "#,
        table_name
    ))
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| ProfileError::Storage(e.to_string()))?;

    Ok(())
}
