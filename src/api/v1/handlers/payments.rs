/*
 * Responsibility
 * - /payments 系 handler
 * - provider の失敗詳細は caller に出さない (500 + generic message)
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::dto::payments::{PaymentIntentRequest, PaymentIntentResponse},
    api::v1::extractors::AuthCtxExtractor,
    api::v1::handlers::load_account,
    error::AppError,
    services::authz::{self, Endpoint, GuardContext},
    state::AppState,
};

pub async fn create_payment_intent(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_AMOUNT", m))?;

    let account = load_account(&state, &ctx).await?;
    authz::require_account(Endpoint::PaymentIntent, account, &GuardContext::none())?;

    let intent = state
        .payments
        .create_payment_intent(req.amount, &state.payment_currency)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "payment intent creation failed");
            AppError::Internal
        })?;

    Ok(Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}
