/*
 * Responsibility
 * - items テーブル向け SQLx 操作
 * - list は scope (owner / status / page) を述語にして items と total を同じ条件で返す
 * - request_item は conditional update (available のときだけ)。競合は上書きではなく 0 行
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::repos::Paged;
use crate::repos::error::RepoError;
use crate::services::scope::ItemScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "item_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Available,
    Requested,
    Completed,
}

#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
    #[sqlx(rename = "itemId")]
    pub item_id: i64,

    pub title: String,
    pub author: Option<String>,

    #[sqlx(rename = "coverUrl")]
    pub cover_url: Option<String>,
    #[sqlx(rename = "pickupLocation")]
    pub pickup_location: Option<String>,
    #[sqlx(rename = "availableUntil")]
    pub available_until: Option<DateTime<Utc>>,

    #[sqlx(rename = "ownerEmail")]
    pub owner_email: String,

    pub status: ItemStatus,

    #[sqlx(rename = "requestedBy")]
    pub requested_by: Option<String>,
    #[sqlx(rename = "donationAmount")]
    pub donation_amount: Option<i64>,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Insert payload. `owner_email` always comes from the verified identity,
/// never from the request body.
#[derive(Debug)]
pub struct NewItem<'a> {
    pub title: &'a str,
    pub author: Option<&'a str>,
    pub cover_url: Option<&'a str>,
    pub pickup_location: Option<&'a str>,
    pub available_until: Option<DateTime<Utc>>,
    pub owner_email: &'a str,
}

const ITEM_COLUMNS: &str = r#""itemId", "title", "author", "coverUrl", "pickupLocation", "availableUntil", "ownerEmail", "status", "requestedBy", "donationAmount", "createdAt""#;

pub async fn insert(db: &PgPool, item: &NewItem<'_>) -> Result<ItemRow, RepoError> {
    let row = sqlx::query_as::<_, ItemRow>(&format!(
        r#"
        INSERT INTO items ("title", "author", "coverUrl", "pickupLocation", "availableUntil", "ownerEmail")
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(item.title)
    .bind(item.author)
    .bind(item.cover_url)
    .bind(item.pickup_location)
    .bind(item.available_until)
    .bind(item.owner_email)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn get(db: &PgPool, item_id: i64) -> Result<Option<ItemRow>, RepoError> {
    let row = sqlx::query_as::<_, ItemRow>(&format!(
        r#"
        SELECT {ITEM_COLUMNS}
        FROM items
        WHERE "itemId" = $1
        "#
    ))
    .bind(item_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Scoped, paginated listing.
///
/// The explicit order key matters: skip/limit over an unordered cursor is not
/// stable across calls, so items could be skipped or duplicated between pages.
pub async fn list(db: &PgPool, scope: &ItemScope) -> Result<Paged<ItemRow>, RepoError> {
    let items = sqlx::query_as::<_, ItemRow>(&format!(
        r#"
        SELECT {ITEM_COLUMNS}
        FROM items
        WHERE ($1::text IS NULL OR "ownerEmail" = $1)
          AND ($2::item_status IS NULL OR "status" = $2)
        ORDER BY "createdAt" DESC, "itemId" DESC
        LIMIT $3 OFFSET $4
        "#
    ))
    .bind(scope.owner_email.as_deref())
    .bind(scope.status)
    .bind(scope.page.limit)
    .bind(scope.page.offset)
    .fetch_all(db)
    .await?;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM items
        WHERE ($1::text IS NULL OR "ownerEmail" = $1)
          AND ($2::item_status IS NULL OR "status" = $2)
        "#,
    )
    .bind(scope.owner_email.as_deref())
    .bind(scope.status)
    .fetch_one(db)
    .await?;

    Ok(Paged { items, total })
}

/// Conditional status transition: available -> requested.
///
/// The write is accepted only while the current status is `available`; a lost
/// race is a `Conflict`, never a silent overwrite of "requestedBy". `None`
/// means the item does not exist at all.
pub async fn request_item(
    db: &PgPool,
    item_id: i64,
    requester_email: &str,
    donation_amount: i64,
) -> Result<Option<ItemRow>, RepoError> {
    let row = sqlx::query_as::<_, ItemRow>(&format!(
        r#"
        UPDATE items
        SET
            "status" = 'requested',
            "requestedBy" = $2,
            "donationAmount" = $3
        WHERE "itemId" = $1 AND "status" = 'available'
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(item_id)
    .bind(requester_email)
    .bind(donation_amount)
    .fetch_optional(db)
    .await?;

    match row {
        Some(row) => Ok(Some(row)),
        // Zero rows: either gone or the precondition failed.
        None => match get(db, item_id).await? {
            Some(_) => Err(RepoError::Conflict),
            None => Ok(None),
        },
    }
}

pub async fn count(db: &PgPool) -> Result<i64, RepoError> {
    let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM items"#)
        .fetch_one(db)
        .await?;

    Ok(total)
}

pub async fn count_by_status(db: &PgPool, status: ItemStatus) -> Result<i64, RepoError> {
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM items
        WHERE "status" = $1
        "#,
    )
    .bind(status)
    .fetch_one(db)
    .await?;

    Ok(total)
}
