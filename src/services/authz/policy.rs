//! The authorization policy, as one reviewable table.
//!
//! Every protected operation names an `Endpoint`; `chain()` is the single
//! source of truth for which guards run, in which order. Handlers never
//! compose guards inline.

use crate::error::AppError;
use crate::repos::account_repo::{AccountRow, Role};
use crate::services::authz::guards::{Guard, GuardContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Upsert-on-login. Token-only: account resolution *is* the operation.
    Session,
    Me,
    UpdateMe,
    MyItems,
    CreateItem,
    RequestItem,
    CreateRequest,
    MyRequests,
    RequestDetail,
    UpdateRequest,
    DeleteRequest,
    PaymentIntent,
    AdminListUsers,
    AdminSetRole,
    AdminSetStatus,
    AdminStats,
}

impl Endpoint {
    /// Ordered guard chain. Evaluated front to back, short-circuiting on the
    /// first failure (fail-closed). `Active` sits before every mutating guard.
    pub fn chain(self) -> &'static [Guard] {
        match self {
            Endpoint::Session => &[],

            Endpoint::Me | Endpoint::UpdateMe | Endpoint::MyItems | Endpoint::MyRequests => {
                &[Guard::Authenticated]
            }

            Endpoint::CreateItem
            | Endpoint::RequestItem
            | Endpoint::CreateRequest
            | Endpoint::PaymentIntent => &[Guard::Authenticated, Guard::Active],

            Endpoint::RequestDetail => &[Guard::Authenticated, Guard::OwnerOrRequester],

            Endpoint::UpdateRequest | Endpoint::DeleteRequest => {
                &[Guard::Authenticated, Guard::Active, Guard::OwnerOrRequester]
            }

            Endpoint::AdminListUsers
            | Endpoint::AdminSetRole
            | Endpoint::AdminSetStatus
            | Endpoint::AdminStats => {
                &[Guard::Authenticated, Guard::Active, Guard::HasRole(Role::Admin)]
            }
        }
    }
}

/// Walk the endpoint's chain. First failure terminates the chain and is
/// returned as-is; it is never converted into empty/default data.
pub fn authorize(
    endpoint: Endpoint,
    account: Option<&AccountRow>,
    ctx: &GuardContext<'_>,
) -> Result<(), AppError> {
    for guard in endpoint.chain() {
        guard.evaluate(account, ctx)?;
    }
    Ok(())
}

/// `authorize`, then hand the account back to the handler.
///
/// Only meaningful for chains that start with `Authenticated`; those guarantee
/// the account is present when the chain passes.
pub fn require_account(
    endpoint: Endpoint,
    account: Option<AccountRow>,
    ctx: &GuardContext<'_>,
) -> Result<AccountRow, AppError> {
    authorize(endpoint, account.as_ref(), ctx)?;
    account.ok_or_else(|| AppError::unauthorized("authentication required"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::account_repo::AccountStatus;
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

    const ALL: &[Endpoint] = &[
        Endpoint::Session,
        Endpoint::Me,
        Endpoint::UpdateMe,
        Endpoint::MyItems,
        Endpoint::CreateItem,
        Endpoint::RequestItem,
        Endpoint::CreateRequest,
        Endpoint::MyRequests,
        Endpoint::RequestDetail,
        Endpoint::UpdateRequest,
        Endpoint::DeleteRequest,
        Endpoint::PaymentIntent,
        Endpoint::AdminListUsers,
        Endpoint::AdminSetRole,
        Endpoint::AdminSetStatus,
        Endpoint::AdminStats,
    ];

    #[test]
    fn every_chain_but_session_requires_authentication_first() {
        for endpoint in ALL {
            let chain = endpoint.chain();
            if *endpoint == Endpoint::Session {
                assert!(chain.is_empty());
            } else {
                assert_eq!(chain[0], Guard::Authenticated);
            }
        }
    }

    #[test]
    fn active_precedes_owner_guard_on_mutations() {
        for endpoint in [Endpoint::UpdateRequest, Endpoint::DeleteRequest] {
            let chain = endpoint.chain();
            let active = chain.iter().position(|g| *g == Guard::Active).unwrap();
            let owner = chain
                .iter()
                .position(|g| *g == Guard::OwnerOrRequester)
                .unwrap();
            assert!(active < owner);
        }
    }

    #[test]
    fn unauthenticated_caller_gets_401_on_every_protected_endpoint() {
        for endpoint in ALL.iter().filter(|e| **e != Endpoint::Session) {
            let err = authorize(*endpoint, None, &GuardContext::none()).unwrap_err();
            assert!(
                matches!(err, AppError::Unauthorized { .. }),
                "{endpoint:?} should be 401"
            );
        }
    }

    #[test]
    fn blocked_caller_gets_403_on_mutating_endpoints() {
        let blocked = account("b@example.com", Role::Donor, AccountStatus::Blocked);
        for endpoint in [
            Endpoint::CreateItem,
            Endpoint::RequestItem,
            Endpoint::CreateRequest,
            Endpoint::PaymentIntent,
            Endpoint::UpdateRequest,
            Endpoint::DeleteRequest,
        ] {
            let err = authorize(
                endpoint,
                Some(&blocked),
                &GuardContext::owned_by("b@example.com"),
            )
            .unwrap_err();
            assert!(
                matches!(err, AppError::Forbidden { message: "blocked" }),
                "{endpoint:?} should be 403 blocked"
            );
        }
    }

    #[test]
    fn non_admin_gets_403_on_admin_endpoints() {
        let donor = account("d@example.com", Role::Donor, AccountStatus::Active);
        for endpoint in [
            Endpoint::AdminListUsers,
            Endpoint::AdminSetRole,
            Endpoint::AdminSetStatus,
            Endpoint::AdminStats,
        ] {
            let err = authorize(endpoint, Some(&donor), &GuardContext::none()).unwrap_err();
            assert!(matches!(
                err,
                AppError::Forbidden {
                    message: "insufficient role"
                }
            ));
        }
    }

    #[test]
    fn request_detail_rejects_strangers_but_not_requester_or_admin() {
        let ctx = GuardContext::owned_by("requester@example.com");

        let requester = account("requester@example.com", Role::Donor, AccountStatus::Active);
        assert!(authorize(Endpoint::RequestDetail, Some(&requester), &ctx).is_ok());

        let admin = account("admin@example.com", Role::Admin, AccountStatus::Active);
        assert!(authorize(Endpoint::RequestDetail, Some(&admin), &ctx).is_ok());

        let stranger = account("other@example.com", Role::Donor, AccountStatus::Active);
        assert!(matches!(
            authorize(Endpoint::RequestDetail, Some(&stranger), &ctx).unwrap_err(),
            AppError::Forbidden { message: "not owner" }
        ));
    }

    #[test]
    fn blocked_requester_can_still_read_their_own_request_detail() {
        // Detail is a read; the Active guard is deliberately absent there.
        let blocked = account("b@example.com", Role::Donor, AccountStatus::Blocked);
        let ctx = GuardContext::owned_by("b@example.com");
        assert!(authorize(Endpoint::RequestDetail, Some(&blocked), &ctx).is_ok());
    }

    #[test]
    fn require_account_returns_the_account_on_pass() {
        let donor = account("d@example.com", Role::Donor, AccountStatus::Active);
        let got = require_account(Endpoint::Me, Some(donor), &GuardContext::none()).unwrap();
        assert_eq!(got.email, "d@example.com");
    }
}
