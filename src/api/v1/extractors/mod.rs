/*
 * Responsibility
 * - handler が受け取る契約型 (AuthCtx / PublicId) の公開
 */
pub mod auth_ctx;
pub mod public_id;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
