/*
 * Responsibility
 * - (caller identity, raw filters, raw pagination) → scoped query の組み立て
 * - page/limit の正規化 (endpoint ごとの default、上限 clamp、skip 計算)
 * - filter の allow-list 適用 ("all"/欠落 = 無条件)
 * - "my X" 系は owner/requester を verified email で強制上書き
 */
use serde::Deserialize;

use crate::error::AppError;
use crate::repos::item_repo::ItemStatus;
use crate::repos::request_repo::RequestStatus;

/// Hard ceiling for any caller-supplied limit. Without a bound a single
/// request could page the whole collection.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Endpoint-fixed default page sizes.
pub const ITEM_PAGE_LIMIT: i64 = 3;
pub const REQUEST_PAGE_LIMIT: i64 = 5;
pub const USER_PAGE_LIMIT: i64 = 10;

/// Raw pagination as it arrives on the query string.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Normalized pagination. `offset` is always `(page - 1) * limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl PageParams {
    /// Normalize against an endpoint-fixed default limit.
    ///
    /// - page defaults to 1 and clamps to >= 1
    /// - limit defaults per endpoint and clamps to 1..=MAX_PAGE_LIMIT
    ///   (limit=0 floors to 1; no endpoint opts into "return all")
    pub fn normalize(self, default_limit: i64) -> Page {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_LIMIT);

        Page {
            limit,
            offset: (page - 1) * limit,
        }
    }
}

/// Allow-listed item status filter. `all` or absence lifts the restriction;
/// anything else is the caller's mistake, not a predicate to ignore.
pub fn item_status_filter(raw: Option<&str>) -> Result<Option<ItemStatus>, AppError> {
    match raw {
        None | Some("all") => Ok(None),
        Some("available") => Ok(Some(ItemStatus::Available)),
        Some("requested") => Ok(Some(ItemStatus::Requested)),
        Some("completed") => Ok(Some(ItemStatus::Completed)),
        Some(_) => Err(AppError::bad_request(
            "INVALID_FILTER",
            "unknown status filter",
        )),
    }
}

pub fn request_status_filter(raw: Option<&str>) -> Result<Option<RequestStatus>, AppError> {
    match raw {
        None | Some("all") => Ok(None),
        Some("pending") => Ok(Some(RequestStatus::Pending)),
        Some("approved") => Ok(Some(RequestStatus::Approved)),
        Some("rejected") => Ok(Some(RequestStatus::Rejected)),
        Some(_) => Err(AppError::bad_request(
            "INVALID_FILTER",
            "unknown status filter",
        )),
    }
}

/// Scoped item query. Built only through the constructors below so that a
/// "my items" scope can never lose its owner predicate.
#[derive(Debug, Clone)]
pub struct ItemScope {
    pub owner_email: Option<String>,
    pub status: Option<ItemStatus>,
    pub page: Page,
}

impl ItemScope {
    /// Public catalogue: no owner restriction.
    pub fn catalogue(filter: Option<&str>, params: PageParams) -> Result<Self, AppError> {
        Ok(Self {
            owner_email: None,
            status: item_status_filter(filter)?,
            page: params.normalize(ITEM_PAGE_LIMIT),
        })
    }

    /// "My items": the owner predicate is forced to the verified caller email,
    /// regardless of anything the client supplied.
    pub fn mine(caller_email: &str, filter: Option<&str>, params: PageParams) -> Result<Self, AppError> {
        Ok(Self {
            owner_email: Some(caller_email.to_owned()),
            status: item_status_filter(filter)?,
            page: params.normalize(ITEM_PAGE_LIMIT),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RequestScope {
    pub requester_email: Option<String>,
    pub status: Option<RequestStatus>,
    pub page: Page,
}

impl RequestScope {
    /// "My requests": requester forced to the verified caller email.
    pub fn mine(
        caller_email: &str,
        filter: Option<&str>,
        params: PageParams,
    ) -> Result<Self, AppError> {
        Ok(Self {
            requester_email: Some(caller_email.to_owned()),
            status: request_status_filter(filter)?,
            page: params.normalize(REQUEST_PAGE_LIMIT),
        })
    }
}

/// Admin user listing scope. Always excludes the calling admin.
#[derive(Debug, Clone)]
pub struct UserScope {
    pub exclude_email: String,
    pub page: Page,
}

impl UserScope {
    pub fn all_except(caller_email: &str, params: PageParams) -> Self {
        Self {
            exclude_email: caller_email.to_owned(),
            page: params.normalize(USER_PAGE_LIMIT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<i64>, limit: Option<i64>) -> PageParams {
        PageParams { page, limit }
    }

    // Mirror of what LIMIT/OFFSET does in the store, for property checks.
    fn apply_page(page: &Page, rows: &[i64]) -> Vec<i64> {
        rows.iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .copied()
            .collect()
    }

    #[test]
    fn page_defaults_to_first() {
        let page = params(None, None).normalize(ITEM_PAGE_LIMIT);
        assert_eq!(page, Page { limit: 3, offset: 0 });
    }

    #[test]
    fn page_clamps_to_at_least_one() {
        for bad_page in [0, -1, -99] {
            let page = params(Some(bad_page), None).normalize(ITEM_PAGE_LIMIT);
            assert_eq!(page.offset, 0);
        }
    }

    #[test]
    fn limit_clamps_to_upper_bound() {
        let page = params(None, Some(10_000)).normalize(USER_PAGE_LIMIT);
        assert_eq!(page.limit, MAX_PAGE_LIMIT);
    }

    #[test]
    fn limit_zero_floors_to_one() {
        let page = params(None, Some(0)).normalize(REQUEST_PAGE_LIMIT);
        assert_eq!(page.limit, 1);
    }

    #[test]
    fn skip_is_page_minus_one_times_limit() {
        let page = params(Some(4), Some(7)).normalize(ITEM_PAGE_LIMIT);
        assert_eq!(page, Page { limit: 7, offset: 21 });
    }

    #[test]
    fn endpoint_defaults_differ() {
        assert_eq!(params(None, None).normalize(ITEM_PAGE_LIMIT).limit, 3);
        assert_eq!(params(None, None).normalize(REQUEST_PAGE_LIMIT).limit, 5);
        assert_eq!(params(None, None).normalize(USER_PAGE_LIMIT).limit, 10);
    }

    #[test]
    fn filter_all_and_absence_lift_the_restriction() {
        assert_eq!(item_status_filter(None).unwrap(), None);
        assert_eq!(item_status_filter(Some("all")).unwrap(), None);
        assert_eq!(
            item_status_filter(Some("available")).unwrap(),
            Some(ItemStatus::Available)
        );
    }

    #[test]
    fn unknown_filter_is_rejected() {
        assert!(item_status_filter(Some("borrowed")).is_err());
        assert!(request_status_filter(Some("available")).is_err());
    }

    #[test]
    fn mine_scope_forces_owner_to_caller() {
        let scope = ItemScope::mine("donor@example.com", Some("all"), params(None, None)).unwrap();
        assert_eq!(scope.owner_email.as_deref(), Some("donor@example.com"));

        let scope = RequestScope::mine("donor@example.com", None, params(Some(2), None)).unwrap();
        assert_eq!(scope.requester_email.as_deref(), Some("donor@example.com"));
    }

    #[test]
    fn second_page_of_seven_items_is_ranks_four_to_six() {
        // 7 items ordered by creation descending, filter=all, page=2, limit 3.
        let ordered: Vec<i64> = (1..=7).rev().collect();
        let scope = ItemScope::catalogue(Some("all"), params(Some(2), None)).unwrap();

        let items = apply_page(&scope.page, &ordered);
        assert_eq!(items, vec![4, 3, 2]); // ranks 4..=6 of the full result
        assert_eq!(ordered.len(), 7); // total reported alongside
    }

    #[test]
    fn consecutive_pages_tile_the_ordered_set() {
        let ordered: Vec<i64> = (1..=10).rev().collect();
        let limit = 3;

        let mut seen = Vec::new();
        for page_no in 1..=4 {
            let page = params(Some(page_no), Some(limit)).normalize(ITEM_PAGE_LIMIT);
            seen.extend(apply_page(&page, &ordered));
        }

        // Union of pages 1..k equals the first k*limit items: no gaps, no dups.
        assert_eq!(seen, ordered);
    }

    #[test]
    fn page_beyond_the_end_is_empty() {
        let ordered: Vec<i64> = (1..=7).rev().collect();
        let page = params(Some(9), None).normalize(ITEM_PAGE_LIMIT);
        assert!(apply_page(&page, &ordered).is_empty());
    }
}
