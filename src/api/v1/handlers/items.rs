/*
 * Responsibility
 * - /items 系 handler (public catalogue / detail、my items、作成、request 遷移)
 * - Path の id は公開 ID → extractor で復号して内部 ID に変換して受け取る
 */
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::items::{
        CreateItemRequest, ItemListQuery, ItemResponse, ItemsResponse, RequestItemRequest,
    },
    api::v1::extractors::AuthCtxExtractor,
    api::v1::extractors::public_id::PublicItemId,
    api::v1::handlers::load_account,
    error::AppError,
    repos::error::RepoError,
    repos::item_repo::{self, NewItem},
    services::authz::{self, Endpoint, GuardContext},
    services::scope::{ItemScope, PageParams},
    state::AppState,
};

fn row_to_response(state: &AppState, row: item_repo::ItemRow) -> Result<ItemResponse, AppError> {
    let public_id = state.id_codec.encode(row.item_id)?;
    Ok(ItemResponse::from_row(public_id, row))
}

fn rows_to_response(
    state: &AppState,
    paged: crate::repos::Paged<item_repo::ItemRow>,
) -> Result<ItemsResponse, AppError> {
    let mut items = Vec::with_capacity(paged.items.len());
    for row in paged.items {
        items.push(row_to_response(state, row)?);
    }

    Ok(ItemsResponse {
        items,
        total: paged.total,
    })
}

/// Public catalogue. No auth, but still scoped + paginated like everything else.
pub async fn list_catalogue(
    State(state): State<AppState>,
    Query(query): Query<ItemListQuery>,
) -> Result<Json<ItemsResponse>, AppError> {
    let scope = ItemScope::catalogue(
        query.filter.as_deref(),
        PageParams {
            page: query.page,
            limit: query.limit,
        },
    )?;

    let paged = item_repo::list(&state.db, &scope).await?;
    Ok(Json(rows_to_response(&state, paged)?))
}

/// Public detail.
pub async fn item_detail(
    State(state): State<AppState>,
    item_id: PublicItemId,
) -> Result<Json<ItemResponse>, AppError> {
    let row = item_repo::get(&state.db, item_id.id)
        .await?
        .ok_or(AppError::not_found("item"))?;

    Ok(Json(row_to_response(&state, row)?))
}

pub async fn my_items(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Query(query): Query<ItemListQuery>,
) -> Result<Json<ItemsResponse>, AppError> {
    let account = load_account(&state, &ctx).await?;
    let account = authz::require_account(Endpoint::MyItems, account, &GuardContext::none())?;

    // Owner is forced to the caller; the query string cannot widen this.
    let scope = ItemScope::mine(
        &account.email,
        query.filter.as_deref(),
        PageParams {
            page: query.page,
            limit: query.limit,
        },
    )?;

    let paged = item_repo::list(&state.db, &scope).await?;
    Ok(Json(rows_to_response(&state, paged)?))
}

pub async fn create_item(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_ITEM", m))?;

    let account = load_account(&state, &ctx).await?;
    let account = authz::require_account(Endpoint::CreateItem, account, &GuardContext::none())?;

    let row = item_repo::insert(
        &state.db,
        &NewItem {
            title: &req.title,
            author: req.author.as_deref(),
            cover_url: req.cover_url.as_deref(),
            pickup_location: req.pickup_location.as_deref(),
            available_until: req.available_until,
            owner_email: &account.email,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(row_to_response(&state, row)?)))
}

/// Donor requests an item. Conditional transition available -> requested;
/// a lost race is a 409, never a silent overwrite of "requestedBy".
pub async fn request_item(
    State(state): State<AppState>,
    item_id: PublicItemId,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<RequestItemRequest>,
) -> Result<Json<ItemResponse>, AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_DONATION", m))?;

    let account = load_account(&state, &ctx).await?;
    let account = authz::require_account(Endpoint::RequestItem, account, &GuardContext::none())?;

    let row =
        item_repo::request_item(&state.db, item_id.id, &account.email, req.donation_amount)
            .await
            .map_err(|e| match e {
                RepoError::Conflict => AppError::conflict("item is no longer available"),
                other => other.into(),
            })?
            .ok_or(AppError::not_found("item"))?;

    Ok(Json(row_to_response(&state, row)?))
}
