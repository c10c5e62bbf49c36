/*
 * Responsibility
 * - repo 層の公開インターフェース (re-export)
 * - Paged<T>: list 系 repo の共通戻り値 (items + total は同じ述語で数える)
 */
pub mod account_repo;
pub mod error;
pub mod item_repo;
pub mod request_repo;

/// Result of a paginated, scoped query.
///
/// `total` is always computed from the same filter predicate as `items`,
/// never from an unfiltered count.
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: i64,
}
