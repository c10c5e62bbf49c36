/*
 * Responsibility
 * - v1 handler 群の公開と、handler 共通の小物
 */
pub mod accounts;
pub mod admin;
pub mod health;
pub mod items;
pub mod payments;
pub mod requests;

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::repos::account_repo::AccountRow;
use crate::services::identity;
use crate::state::AppState;

/// Load the caller's account for the authorization gate.
///
/// `None` is a legitimate outcome (verified token, no account yet); the gate
/// turns it into 401, not this helper.
pub(crate) async fn load_account(
    state: &AppState,
    ctx: &AuthCtx,
) -> Result<Option<AccountRow>, AppError> {
    let account = identity::current_account(&state.db, &ctx.claims).await?;
    Ok(account)
}
