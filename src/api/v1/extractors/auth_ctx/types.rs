/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - token の検証ロジックは middleware/services 側の責務
 * - ここは「型（契約）」として固定化する
 */

use crate::services::auth::IdentityClaims;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `claims.email` が account への join key
/// - role/status は token には乗らない。store 側の account が持つ
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub claims: IdentityClaims,
}

impl AuthCtx {
    pub fn new(claims: IdentityClaims) -> Self {
        Self { claims }
    }

    pub fn email(&self) -> &str {
        &self.claims.email
    }
}
