/*
 * Responsibility
 * - AccessRequest (donation request) の request/response DTO
 * - requesterEmail は DTO に存在しない。verified identity からのみ入る
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::request_repo::{RequestRow, RequestStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestRequest {
    /// Public id of the item the request is about.
    pub item_id: String,
    pub message: Option<String>,
}

impl CreateRequestRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.item_id.trim().is_empty() {
            return Err("itemId is required");
        }
        if let Some(message) = &self.message
            && message.len() > 1000
        {
            return Err("message must be <= 1000 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestRequest {
    pub status: Option<RequestStatus>,
    pub message: Option<String>,
}

impl UpdateRequestRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(message) = &self.message
            && message.len() > 1000
        {
            return Err("message must be <= 1000 chars");
        }
        Ok(())
    }
}

/// Query string of "my requests".
#[derive(Debug, Default, Deserialize)]
pub struct RequestListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponse {
    pub id: String,
    pub item_id: String,
    pub requester_email: String,
    pub message: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl RequestResponse {
    pub fn from_row(public_id: String, public_item_id: String, row: RequestRow) -> Self {
        Self {
            id: public_id,
            item_id: public_item_id,
            requester_email: row.requester_email,
            message: row.message,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestsResponse {
    pub requests: Vec<RequestResponse>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requester_email_cannot_be_supplied_by_the_client() {
        // The field simply does not exist on the DTO; a body that tries is
        // deserialized without it.
        let req: CreateRequestRequest = serde_json::from_str(
            r#"{"itemId":"abc123defg","requesterEmail":"evil@example.com"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_accepts_known_statuses_only() {
        assert!(
            serde_json::from_str::<UpdateRequestRequest>(r#"{"status":"approved"}"#).is_ok()
        );
        assert!(
            serde_json::from_str::<UpdateRequestRequest>(r#"{"status":"available"}"#).is_err()
        );
    }
}
