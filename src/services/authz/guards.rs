//! Single pass/fail authorization checks, composable into per-endpoint chains.
//!
//! A failed guard always surfaces as an explicit 401/403, never as a
//! filtered-empty success. Role and status are exhaustive enums here; there is
//! no string comparison and no implicit default.

use crate::error::AppError;
use crate::repos::account_repo::{AccountRow, AccountStatus, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Requires a resolved account. Absence is 401, not an empty result.
    Authenticated,
    /// Requires status = active. Must sit before any mutating guard in a chain.
    Active,
    /// Requires the given role.
    HasRole(Role),
    /// Requires the caller to be the resource's owner/requester, or an admin.
    OwnerOrRequester,
}

/// Per-request facts a guard may need beyond the account itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuardContext<'a> {
    /// Owner/requester email of the resource under access, when one has been
    /// fetched. `OwnerOrRequester` fails closed when this is absent.
    pub resource_owner: Option<&'a str>,
}

impl<'a> GuardContext<'a> {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn owned_by(email: &'a str) -> Self {
        Self {
            resource_owner: Some(email),
        }
    }
}

impl Guard {
    pub fn evaluate(
        &self,
        account: Option<&AccountRow>,
        ctx: &GuardContext<'_>,
    ) -> Result<(), AppError> {
        match self {
            Guard::Authenticated => match account {
                Some(_) => Ok(()),
                None => Err(AppError::unauthorized("authentication required")),
            },

            Guard::Active => {
                let account =
                    account.ok_or_else(|| AppError::unauthorized("authentication required"))?;
                match account.status {
                    AccountStatus::Active => Ok(()),
                    AccountStatus::Blocked => Err(AppError::forbidden("blocked")),
                }
            }

            Guard::HasRole(required) => {
                let account =
                    account.ok_or_else(|| AppError::unauthorized("authentication required"))?;
                if account.role == *required {
                    Ok(())
                } else {
                    Err(AppError::forbidden("insufficient role"))
                }
            }

            Guard::OwnerOrRequester => {
                let account =
                    account.ok_or_else(|| AppError::unauthorized("authentication required"))?;
                match account.role {
                    // Admins see and mutate everything.
                    Role::Admin => Ok(()),
                    Role::Donor => match ctx.resource_owner {
                        Some(owner) if owner == account.email => Ok(()),
                        // No fetched owner means the chain was wired wrong;
                        // fail closed rather than open.
                        _ => Err(AppError::forbidden("not owner")),
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn account(email: &str, role: Role, status: AccountStatus) -> AccountRow {
        AccountRow {
            account_id: 1,
            email: email.to_owned(),
            display_name: None,
            photo_url: None,
            role,
            status,
            login_count: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn authenticated_rejects_missing_account() {
        let err = Guard::Authenticated
            .evaluate(None, &GuardContext::none())
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[test]
    fn active_rejects_blocked_account() {
        let blocked = account("a@example.com", Role::Donor, AccountStatus::Blocked);
        let err = Guard::Active
            .evaluate(Some(&blocked), &GuardContext::none())
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { message: "blocked" }));
    }

    #[test]
    fn has_role_rejects_non_admin() {
        let donor = account("a@example.com", Role::Donor, AccountStatus::Active);
        let err = Guard::HasRole(Role::Admin)
            .evaluate(Some(&donor), &GuardContext::none())
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Forbidden {
                message: "insufficient role"
            }
        ));
    }

    #[test]
    fn owner_guard_accepts_owner_and_admin_only() {
        let owner = account("owner@example.com", Role::Donor, AccountStatus::Active);
        let other = account("other@example.com", Role::Donor, AccountStatus::Active);
        let admin = account("admin@example.com", Role::Admin, AccountStatus::Active);
        let ctx = GuardContext::owned_by("owner@example.com");

        assert!(Guard::OwnerOrRequester.evaluate(Some(&owner), &ctx).is_ok());
        assert!(Guard::OwnerOrRequester.evaluate(Some(&admin), &ctx).is_ok());
        assert!(matches!(
            Guard::OwnerOrRequester
                .evaluate(Some(&other), &ctx)
                .unwrap_err(),
            AppError::Forbidden { message: "not owner" }
        ));
    }

    #[test]
    fn owner_guard_fails_closed_without_a_fetched_owner() {
        let donor = account("a@example.com", Role::Donor, AccountStatus::Active);
        assert!(
            Guard::OwnerOrRequester
                .evaluate(Some(&donor), &GuardContext::none())
                .is_err()
        );
    }
}
