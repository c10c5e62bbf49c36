/*
 * Responsibility
 * - service 層の公開インターフェース (re-export)
 */
pub mod auth;
pub mod authz;
pub mod id_codec;
pub mod identity;
pub mod payments;
pub mod scope;
