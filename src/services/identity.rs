/*
 * Responsibility
 * - verified claims → internal Account の解決
 * - upsert-on-login (初見は donor/active で作成、以降は loginCount++ と表示情報の更新のみ)
 * - donor/active の default はここ (と DB default) に一元化する。call site で再導出しない
 */
use sqlx::PgPool;

use crate::repos::account_repo::{self, AccountRow};
use crate::repos::error::RepoError;
use crate::services::auth::IdentityClaims;

/// Resolve a verified identity to an account, creating it on first sight.
///
/// Display fields are "display only": the body-supplied values win over the
/// token's claims, but neither can ever touch role or status. The upsert
/// statement simply has no such columns.
pub async fn resolve_on_login(
    db: &PgPool,
    claims: &IdentityClaims,
    display_name: Option<&str>,
    photo_url: Option<&str>,
) -> Result<AccountRow, RepoError> {
    let display_name = display_name.or(claims.display_name.as_deref());
    let photo_url = photo_url.or(claims.photo_url.as_deref());

    account_repo::upsert_on_login(db, &claims.email, display_name, photo_url).await
}

/// Load the caller's account without touching loginCount.
///
/// `None` means the identity has never completed a login; the authorization
/// gate treats that as unauthenticated.
pub async fn current_account(
    db: &PgPool,
    claims: &IdentityClaims,
) -> Result<Option<AccountRow>, RepoError> {
    account_repo::find_by_email(db, &claims.email).await
}
