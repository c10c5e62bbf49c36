/*
 * Responsibility
 * - accounts テーブル向け SQLx 操作
 * - upsert-on-login は 1 文の atomic upsert (read-then-write しない)
 * - role / status はこの upsert では絶対に触らない (admin 専用の setter のみ)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::repos::Paged;
use crate::repos::error::RepoError;
use crate::services::scope::UserScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Admin,
}

/// Account standing. Not the same thing as an item's availability status;
/// the two must never share a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Blocked,
}

#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    #[sqlx(rename = "accountId")]
    pub account_id: i64,

    pub email: String,

    #[sqlx(rename = "displayName")]
    pub display_name: Option<String>,
    #[sqlx(rename = "photoUrl")]
    pub photo_url: Option<String>,

    pub role: Role,
    pub status: AccountStatus,

    #[sqlx(rename = "loginCount")]
    pub login_count: i64,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

const ACCOUNT_COLUMNS: &str = r#""accountId", "email", "displayName", "photoUrl", "role", "status", "loginCount", "createdAt""#;

/// Atomic upsert-on-login.
///
/// First sight inserts donor/active (table defaults) with loginCount = 1;
/// every later call increments loginCount and refreshes display fields.
/// Concurrent calls for the same unseen email cannot create two rows:
/// the unique index on "email" plus ON CONFLICT resolves the race in the store.
pub async fn upsert_on_login(
    db: &PgPool,
    email: &str,
    display_name: Option<&str>,
    photo_url: Option<&str>,
) -> Result<AccountRow, RepoError> {
    let row = sqlx::query_as::<_, AccountRow>(&format!(
        r#"
        INSERT INTO accounts ("email", "displayName", "photoUrl", "loginCount")
        VALUES ($1, $2, $3, 1)
        ON CONFLICT ("email") DO UPDATE SET
            "loginCount" = accounts."loginCount" + 1,
            "displayName" = COALESCE(EXCLUDED."displayName", accounts."displayName"),
            "photoUrl" = COALESCE(EXCLUDED."photoUrl", accounts."photoUrl")
        RETURNING {ACCOUNT_COLUMNS}
        "#
    ))
    .bind(email)
    .bind(display_name)
    .bind(photo_url)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<AccountRow>, RepoError> {
    let row = sqlx::query_as::<_, AccountRow>(&format!(
        r#"
        SELECT {ACCOUNT_COLUMNS}
        FROM accounts
        WHERE "email" = $1
        "#
    ))
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Admin user listing. Excludes the calling admin, newest account first.
pub async fn list(db: &PgPool, scope: &UserScope) -> Result<Paged<AccountRow>, RepoError> {
    let items = sqlx::query_as::<_, AccountRow>(&format!(
        r#"
        SELECT {ACCOUNT_COLUMNS}
        FROM accounts
        WHERE "email" <> $1
        ORDER BY "createdAt" DESC, "accountId" DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(&scope.exclude_email)
    .bind(scope.page.limit)
    .bind(scope.page.offset)
    .fetch_all(db)
    .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM accounts
        WHERE "email" <> $1
        "#,
    )
    .bind(&scope.exclude_email)
    .fetch_one(db)
    .await?;

    Ok(Paged { items, total })
}

pub async fn set_role(db: &PgPool, email: &str, role: Role) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        UPDATE accounts
        SET "role" = $2
        WHERE "email" = $1
        "#,
    )
    .bind(email)
    .bind(role)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn set_status(db: &PgPool, email: &str, status: AccountStatus) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        UPDATE accounts
        SET "status" = $2
        WHERE "email" = $1
        "#,
    )
    .bind(email)
    .bind(status)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn update_profile(
    db: &PgPool,
    email: &str,
    display_name: Option<&str>,
    photo_url: Option<&str>,
) -> Result<Option<AccountRow>, RepoError> {
    let row = sqlx::query_as::<_, AccountRow>(&format!(
        r#"
        UPDATE accounts
        SET
            "displayName" = COALESCE($2, "displayName"),
            "photoUrl" = COALESCE($3, "photoUrl")
        WHERE "email" = $1
        RETURNING {ACCOUNT_COLUMNS}
        "#
    ))
    .bind(email)
    .bind(display_name)
    .bind(photo_url)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn count(db: &PgPool) -> Result<i64, RepoError> {
    let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM accounts"#)
        .fetch_one(db)
        .await?;

    Ok(total)
}
