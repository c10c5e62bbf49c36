/*
 * Responsibility
 * - /session (upsert-on-login) と /me 系 handler
 * - email は必ず verified claims から。body の表示情報は display only
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::dto::accounts::{AccountResponse, SessionRequest, UpdateProfileRequest},
    api::v1::extractors::AuthCtxExtractor,
    api::v1::handlers::load_account,
    error::AppError,
    repos::account_repo,
    services::authz::{self, Endpoint, GuardContext},
    services::identity,
    state::AppState,
};

/// Upsert-on-login. Creates the account on first sight (donor/active), then
/// only increments loginCount and refreshes display fields.
pub async fn create_session(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<SessionRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_PROFILE", m))?;

    // Token-only chain: resolution is the operation itself.
    authz::authorize(Endpoint::Session, None, &GuardContext::none())?;

    let row = identity::resolve_on_login(
        &state.db,
        &ctx.claims,
        req.display_name.as_deref(),
        req.photo_url.as_deref(),
    )
    .await?;

    Ok(Json(AccountResponse::from(row)))
}

pub async fn me(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<AccountResponse>, AppError> {
    let account = load_account(&state, &ctx).await?;
    let account = authz::require_account(Endpoint::Me, account, &GuardContext::none())?;

    Ok(Json(AccountResponse::from(account)))
}

pub async fn update_me(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_PROFILE", m))?;

    let account = load_account(&state, &ctx).await?;
    let account = authz::require_account(Endpoint::UpdateMe, account, &GuardContext::none())?;

    let row = account_repo::update_profile(
        &state.db,
        &account.email,
        req.display_name.as_deref(),
        req.photo_url.as_deref(),
    )
    .await?
    .ok_or(AppError::not_found("account"))?;

    Ok(Json(AccountResponse::from(row)))
}
