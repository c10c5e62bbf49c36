/*
 * Responsibility
 * - /admin 系 handler (user listing、role/status 管理、dashboard 集計)
 * - すべて hasRole(admin) の chain 越しにしか到達しない
 */
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::accounts::{
        AccountResponse, StatsResponse, UpdateRoleRequest, UpdateStatusRequest, UsersResponse,
    },
    api::v1::extractors::AuthCtxExtractor,
    api::v1::handlers::load_account,
    error::AppError,
    repos::account_repo,
    repos::item_repo::{self, ItemStatus},
    services::authz::{self, Endpoint, GuardContext},
    services::scope::{PageParams, UserScope},
    state::AppState,
};

pub async fn list_users(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Query(params): Query<PageParams>,
) -> Result<Json<UsersResponse>, AppError> {
    let account = load_account(&state, &ctx).await?;
    let account = authz::require_account(Endpoint::AdminListUsers, account, &GuardContext::none())?;

    let scope = UserScope::all_except(&account.email, params);
    let paged = account_repo::list(&state.db, &scope).await?;

    Ok(Json(UsersResponse {
        users: paged.items.into_iter().map(AccountResponse::from).collect(),
        total: paged.total,
    }))
}

pub async fn set_role(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<StatusCode, AppError> {
    if req.email.trim().is_empty() {
        return Err(AppError::bad_request("INVALID_EMAIL", "email is required"));
    }

    let account = load_account(&state, &ctx).await?;
    authz::require_account(Endpoint::AdminSetRole, account, &GuardContext::none())?;

    let updated = account_repo::set_role(&state.db, &req.email, req.role).await?;

    if updated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("user"))
    }
}

pub async fn set_status(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<StatusCode, AppError> {
    if req.email.trim().is_empty() {
        return Err(AppError::bad_request("INVALID_EMAIL", "email is required"));
    }

    let account = load_account(&state, &ctx).await?;
    authz::require_account(Endpoint::AdminSetStatus, account, &GuardContext::none())?;

    let updated = account_repo::set_status(&state.db, &req.email, req.status).await?;

    if updated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("user"))
    }
}

pub async fn stats(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<StatsResponse>, AppError> {
    let account = load_account(&state, &ctx).await?;
    authz::require_account(Endpoint::AdminStats, account, &GuardContext::none())?;

    let total_users = account_repo::count(&state.db).await?;
    let total_items = item_repo::count(&state.db).await?;
    let total_requested = item_repo::count_by_status(&state.db, ItemStatus::Requested).await?;

    Ok(Json(StatsResponse {
        total_users,
        total_items,
        total_requested,
    }))
}
