use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::profile::{errors::ProfileError, types::Profile};

// Postgres implementations

pub(super) async fn create_table_postgres(
    pool: &Pool<Postgres>,
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
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
        table_name
    ))
    .execute(pool)
    .await
    .map_err(|e| ProfileError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn get_by_identity_id_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    identity_id: &str,
) -> Result<Option<Profile>, ProfileError> {
    sqlx::query_as::<_, Profile>(&format!(
        r#"
        SELECT * FROM {} WHERE identity_id = $1
        "#,
        table_name
    ))
    .bind(identity_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ProfileError::Storage(e.to_string()))
}

pub(super) async fn get_by_email_scoped_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    email: &str,
    identity_id: &str,
) -> Result<Option<Profile>, ProfileError> {
    sqlx::query_as::<_, Profile>(&format!(
        r#"
        SELECT * FROM {} WHERE email = $1 AND (identity_id IS NULL OR identity_id = $2)
        "#,
        table_name
    ))
    .bind(email)
    .bind(identity_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ProfileError::Storage(e.to_string()))
}

pub(super) async fn get_by_email_privileged_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    email: &str,
    identity_id: &str,
) -> Result<Option<Profile>, ProfileError> {
    sqlx::query_as::<_, Profile>(&format!(
        r#"
        SELECT * FROM {} WHERE LOWER(email) = LOWER($1) AND (identity_id IS NULL OR identity_id = $2)
        "#,
        table_name
    ))
    .bind(email)
    .bind(identity_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ProfileError::Storage(e.to_string()))
}

pub(super) async fn link_identity_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    profile_id: &str,
    identity_id: &str,
) -> Result<bool, ProfileError> {
    let result = sqlx::query(&format!(
        r#"
        UPDATE {} SET identity_id = $1, updated_at = $2
        WHERE id = $3 AND (identity_id IS NULL OR identity_id = $1)
        "#,
        table_name
    ))
    .bind(identity_id)
    .bind(Utc::now())
    .bind(profile_id)
    .execute(pool)
    .await
    .map_err(|e| ProfileError::Storage(e.to_string()))?;

    Ok(result.rows_affected() > 0)
}

pub(super) async fn upsert_profile_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    profile: Profile,
) -> Result<Profile, ProfileError> {
    sqlx::query(&format!(
        r#"
        INSERT INTO {} (id, identity_id, email, display_name, role, status, avatar_url, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
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

pub(super) async fn delete_profile_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    id: &str,
) -> Result<(), ProfileError> {
    sqlx::query(&format!(
        r#"
        DELETE FROM {} WHERE id = $1
        "#,
        table_name
    ))
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| ProfileError::Storage(e.to_string()))?;

    Ok(())
}
