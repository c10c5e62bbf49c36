/*
 * Responsibility
 * - /requests 系 handler (作成、my requests、detail/update/delete)
 * - detail/update/delete は requester 本人か admin のみ (fetch → 404 → gate → 403)
 */
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::requests::{
        CreateRequestRequest, RequestListQuery, RequestResponse, RequestsResponse,
        UpdateRequestRequest,
    },
    api::v1::extractors::AuthCtxExtractor,
    api::v1::extractors::public_id::PublicRequestId,
    api::v1::handlers::load_account,
    error::AppError,
    repos::item_repo,
    repos::request_repo,
    services::authz::{self, Endpoint, GuardContext},
    services::scope::{PageParams, RequestScope},
    state::AppState,
};

fn row_to_response(
    state: &AppState,
    row: request_repo::RequestRow,
) -> Result<RequestResponse, AppError> {
    let public_id = state.id_codec.encode(row.request_id)?;
    let public_item_id = state.id_codec.encode(row.item_id)?;
    Ok(RequestResponse::from_row(public_id, public_item_id, row))
}

pub async fn create_request(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateRequestRequest>,
) -> Result<(StatusCode, Json<RequestResponse>), AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_REQUEST", m))?;

    let account = load_account(&state, &ctx).await?;
    let account = authz::require_account(Endpoint::CreateRequest, account, &GuardContext::none())?;

    let item_id = state.id_codec.decode(&req.item_id)?;
    if item_repo::get(&state.db, item_id).await?.is_none() {
        return Err(AppError::not_found("item"));
    }

    // requesterEmail comes from the verified identity; the body has no such field.
    let row = request_repo::insert(&state.db, item_id, &account.email, req.message.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(row_to_response(&state, row)?)))
}

pub async fn my_requests(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<RequestsResponse>, AppError> {
    let account = load_account(&state, &ctx).await?;
    let account = authz::require_account(Endpoint::MyRequests, account, &GuardContext::none())?;

    let scope = RequestScope::mine(
        &account.email,
        query.status.as_deref(),
        PageParams {
            page: query.page,
            limit: query.limit,
        },
    )?;

    let paged = request_repo::list(&state.db, &scope).await?;

    let mut requests = Vec::with_capacity(paged.items.len());
    for row in paged.items {
        requests.push(row_to_response(&state, row)?);
    }

    Ok(Json(RequestsResponse {
        requests,
        total: paged.total,
    }))
}

pub async fn request_detail(
    State(state): State<AppState>,
    request_id: PublicRequestId,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<RequestResponse>, AppError> {
    let account = load_account(&state, &ctx).await?;

    let row = request_repo::get(&state.db, request_id.id)
        .await?
        .ok_or(AppError::not_found("request"))?;

    authz::authorize(
        Endpoint::RequestDetail,
        account.as_ref(),
        &GuardContext::owned_by(&row.requester_email),
    )?;

    Ok(Json(row_to_response(&state, row)?))
}

pub async fn update_request(
    State(state): State<AppState>,
    request_id: PublicRequestId,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<UpdateRequestRequest>,
) -> Result<Json<RequestResponse>, AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_REQUEST", m))?;

    let account = load_account(&state, &ctx).await?;

    let row = request_repo::get(&state.db, request_id.id)
        .await?
        .ok_or(AppError::not_found("request"))?;

    authz::authorize(
        Endpoint::UpdateRequest,
        account.as_ref(),
        &GuardContext::owned_by(&row.requester_email),
    )?;

    let row = request_repo::update(&state.db, request_id.id, req.status, req.message.as_deref())
        .await?
        .ok_or(AppError::not_found("request"))?;

    Ok(Json(row_to_response(&state, row)?))
}

pub async fn delete_request(
    State(state): State<AppState>,
    request_id: PublicRequestId,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<StatusCode, AppError> {
    let account = load_account(&state, &ctx).await?;

    let row = request_repo::get(&state.db, request_id.id)
        .await?
        .ok_or(AppError::not_found("request"))?;

    authz::authorize(
        Endpoint::DeleteRequest,
        account.as_ref(),
        &GuardContext::owned_by(&row.requester_email),
    )?;

    let deleted = request_repo::delete(&state.db, request_id.id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("request"))
    }
}
