/*
 * Responsibility
 * - token 検証まわりの公開インターフェース
 */
pub mod factory;
mod verifier;

pub use verifier::{AuthService, IdentityClaims, TokenError, TokenVerifier};
