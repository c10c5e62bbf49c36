/*
 * Responsibility
 * - Items の request/response DTO
 * - ownerEmail / status / requestedBy は body から絶対に受け取らない
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::item_repo::{ItemRow, ItemStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub title: String,
    pub author: Option<String>,
    pub cover_url: Option<String>,
    pub pickup_location: Option<String>,
    pub available_until: Option<DateTime<Utc>>,
}

impl CreateItemRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        if let Some(url) = &self.cover_url
            && url.len() > 256
        {
            return Err("coverUrl must be <= 256 chars");
        }
        if let Some(location) = &self.pickup_location
            && location.len() > 256
        {
            return Err("pickupLocation must be <= 256 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestItemRequest {
    /// Minor currency units (e.g. cents).
    pub donation_amount: i64,
}

impl RequestItemRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.donation_amount <= 0 {
            return Err("donationAmount must be positive");
        }
        Ok(())
    }
}

/// Query string of the item listings.
#[derive(Debug, Default, Deserialize)]
pub struct ItemListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub cover_url: Option<String>,
    pub pickup_location: Option<String>,
    pub available_until: Option<DateTime<Utc>>,
    pub owner_email: String,
    pub status: ItemStatus,
    pub requested_by: Option<String>,
    pub donation_amount: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl ItemResponse {
    pub fn from_row(public_id: String, row: ItemRow) -> Self {
        Self {
            id: public_id,
            title: row.title,
            author: row.author,
            cover_url: row.cover_url,
            pickup_location: row.pickup_location,
            available_until: row.available_until,
            owner_email: row.owner_email,
            status: row.status,
            requested_by: row.requested_by,
            donation_amount: row.donation_amount,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsResponse {
    pub items: Vec<ItemResponse>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_item_requires_a_title() {
        let req: CreateItemRequest = serde_json::from_str(r#"{"title":"  "}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreateItemRequest = serde_json::from_str(r#"{"title":"The Hobbit"}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn donation_amount_must_be_positive() {
        for amount in [0, -1, -500] {
            let req = RequestItemRequest {
                donation_amount: amount,
            };
            assert!(req.validate().is_err());
        }
        assert!(
            RequestItemRequest {
                donation_amount: 500
            }
            .validate()
            .is_ok()
        );
    }

    #[test]
    fn body_cannot_smuggle_owner_or_status() {
        // Unknown fields are dropped at deserialization; there is nothing for
        // a handler to forward even by accident.
        let req: CreateItemRequest = serde_json::from_str(
            r#"{"title":"X","ownerEmail":"evil@example.com","status":"completed"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
    }
}
