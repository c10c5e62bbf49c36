/*
 * Responsibility
 * - アプリ共通の ApiError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - sqlx::Error / validation error / auth error を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::id_codec::IdCodecError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("unauthorized: {message}")]
    Unauthorized { message: &'static str },
    #[error("forbidden: {message}")]
    Forbidden { message: &'static str },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("conflict: {message}")]
    Conflict { message: &'static str },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: &'static str) -> Self {
        Self::Unauthorized { message }
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::Forbidden { message }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn conflict(message: &'static str) -> Self {
        Self::Conflict { message }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // 401/403/500 は内部事情を body に出さない (message は固定文字列のみ)
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::Unauthorized { message } => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message.into())
            }
            AppError::Forbidden { message } => (StatusCode::FORBIDDEN, "FORBIDDEN", message.into()),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found."),
            ),
            AppError::Conflict { message } => (StatusCode::CONFLICT, "CONFLICT", message.into()),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::conflict("conflict"),
            RepoError::Db(_) => AppError::Internal,
        }
    }
}

impl From<IdCodecError> for AppError {
    fn from(e: IdCodecError) -> Self {
        match e {
            // Client supplied a malformed public id (e.g. /items/{id})
            IdCodecError::DecodeInvalidFormat | IdCodecError::DecodeOutOfRange => {
                AppError::bad_request("INVALID_PUBLIC_ID", "invalid id")
            }

            // These indicate server-side config / programming errors
            _ => AppError::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn maps_taxonomy_to_status_codes() {
        assert_eq!(
            status_of(AppError::unauthorized("missing token")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::forbidden("blocked")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_of(AppError::not_found("item")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(AppError::bad_request("INVALID_FILTER", "unknown status filter")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::conflict("already requested")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Internal),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn repo_errors_never_leak_detail() {
        let err = AppError::from(RepoError::Db(sqlx::Error::PoolClosed));
        assert!(matches!(err, AppError::Internal));
        assert_eq!(err.to_string(), "internal server error");
    }

    #[test]
    fn malformed_public_id_is_bad_request() {
        let err = AppError::from(IdCodecError::DecodeInvalidFormat);
        assert!(matches!(err, AppError::BadRequest { code: "INVALID_PUBLIC_ID", .. }));
    }
}
