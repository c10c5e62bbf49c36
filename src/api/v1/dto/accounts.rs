/*
 * Responsibility
 * - Accounts の request/response DTO
 * - validation (形式チェック) 用の validate() を持たせる
 * - role/status/email は body から受け取らない (admin DTO を除く)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::account_repo::{AccountRow, AccountStatus, Role};

/// Body of the login upsert. Display fields only; identity comes from the
/// verified token, role/status stay whatever they already are.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl SessionRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.display_name
            && name.trim().is_empty()
        {
            return Err("displayName cannot be empty");
        }
        if let Some(url) = &self.photo_url
            && url.len() > 256
        {
            return Err("photoUrl must be <= 256 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(name) = &self.display_name
            && name.trim().is_empty()
        {
            return Err("displayName cannot be empty");
        }
        if let Some(url) = &self.photo_url
            && url.len() > 256
        {
            return Err("photoUrl must be <= 256 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
    pub status: AccountStatus,
    pub login_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<AccountRow> for AccountResponse {
    fn from(row: AccountRow) -> Self {
        Self {
            email: row.email,
            display_name: row.display_name,
            photo_url: row.photo_url,
            role: row.role,
            status: row.status,
            login_count: row.login_count,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersResponse {
    pub users: Vec<AccountResponse>,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub email: String,
    pub status: AccountStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: i64,
    pub total_items: i64,
    pub total_requested: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_request_rejects_blank_display_name() {
        let req = SessionRequest {
            display_name: Some("   ".into()),
            photo_url: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn session_request_accepts_absent_fields() {
        let req: SessionRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn role_and_status_parse_lowercase_only() {
        assert!(serde_json::from_str::<Role>("\"admin\"").is_ok());
        assert!(serde_json::from_str::<Role>("\"Admin\"").is_err());
        assert!(serde_json::from_str::<AccountStatus>("\"blocked\"").is_ok());
        assert!(serde_json::from_str::<AccountStatus>("\"banned\"").is_err());
    }
}
