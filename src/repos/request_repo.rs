/*
 * Responsibility
 * - requests テーブル向け SQLx 操作
 * - requesterEmail は verified identity からのみ入る (body 由来の値は repo まで届かない)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::repos::Paged;
use crate::repos::error::RepoError;
use crate::services::scope::RequestScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, FromRow)]
pub struct RequestRow {
    #[sqlx(rename = "requestId")]
    pub request_id: i64,

    #[sqlx(rename = "itemId")]
    pub item_id: i64,

    #[sqlx(rename = "requesterEmail")]
    pub requester_email: String,

    pub message: Option<String>,

    pub status: RequestStatus,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

const REQUEST_COLUMNS: &str =
    r#""requestId", "itemId", "requesterEmail", "message", "status", "createdAt""#;

pub async fn insert(
    db: &PgPool,
    item_id: i64,
    requester_email: &str,
    message: Option<&str>,
) -> Result<RequestRow, RepoError> {
    let row = sqlx::query_as::<_, RequestRow>(&format!(
        r#"
        INSERT INTO requests ("itemId", "requesterEmail", "message")
        VALUES ($1, $2, $3)
        RETURNING {REQUEST_COLUMNS}
        "#
    ))
    .bind(item_id)
    .bind(requester_email)
    .bind(message)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn get(db: &PgPool, request_id: i64) -> Result<Option<RequestRow>, RepoError> {
    let row = sqlx::query_as::<_, RequestRow>(&format!(
        r#"
        SELECT {REQUEST_COLUMNS}
        FROM requests
        WHERE "requestId" = $1
        "#
    ))
    .bind(request_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn list(db: &PgPool, scope: &RequestScope) -> Result<Paged<RequestRow>, RepoError> {
    let items = sqlx::query_as::<_, RequestRow>(&format!(
        r#"
        SELECT {REQUEST_COLUMNS}
        FROM requests
        WHERE ($1::text IS NULL OR "requesterEmail" = $1)
          AND ($2::request_status IS NULL OR "status" = $2)
        ORDER BY "createdAt" DESC, "requestId" DESC
        LIMIT $3 OFFSET $4
        "#
    ))
    .bind(scope.requester_email.as_deref())
    .bind(scope.status)
    .bind(scope.page.limit)
    .bind(scope.page.offset)
    .fetch_all(db)
    .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM requests
        WHERE ($1::text IS NULL OR "requesterEmail" = $1)
          AND ($2::request_status IS NULL OR "status" = $2)
        "#,
    )
    .bind(scope.requester_email.as_deref())
    .bind(scope.status)
    .fetch_one(db)
    .await?;

    Ok(Paged { items, total })
}

/// Partial update. `requesterEmail` is immutable by design and has no
/// parameter here.
pub async fn update(
    db: &PgPool,
    request_id: i64,
    status: Option<RequestStatus>,
    message: Option<&str>,
) -> Result<Option<RequestRow>, RepoError> {
    let row = sqlx::query_as::<_, RequestRow>(&format!(
        r#"
        UPDATE requests
        SET
            "status" = COALESCE($2, "status"),
            "message" = COALESCE($3, "message")
        WHERE "requestId" = $1
        RETURNING {REQUEST_COLUMNS}
        "#
    ))
    .bind(request_id)
    .bind(status)
    .bind(message)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn delete(db: &PgPool, request_id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM requests
        WHERE "requestId" = $1
        "#,
    )
    .bind(request_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
