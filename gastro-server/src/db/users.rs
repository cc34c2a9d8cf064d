//! User account queries

use chrono::{DateTime, Utc};
use shared::models::User;
use sqlx::{PgExecutor, PgPool};

use crate::error::ServiceResult;

/// User row including the password hash
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            is_staff: row.is_staff,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> ServiceResult<Option<UserRow>> {
    let row: Option<UserRow> = sqlx::query_as(
        r#"
        SELECT id, username, email, password_hash, is_staff, is_active, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert a user; a taken username surfaces as `UsernameExists`
pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    username: &str,
    email: Option<&str>,
    password_hash: &str,
    is_staff: bool,
) -> ServiceResult<User> {
    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (username, email, password_hash, is_staff)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, email, is_staff, is_active, created_at
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(is_staff)
    .fetch_one(executor)
    .await?;
    Ok(user)
}

pub async fn staff_exists(pool: &PgPool) -> ServiceResult<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE is_staff)")
        .fetch_one(pool)
        .await?;
    Ok(exists)
}
