/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - Bearer が必要な範囲 (protected) とpublic をここで分ける
 * - 認可 chain そのものは services/authz/policy.rs が持つ (ここは配線のみ)
 */
use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{
    accounts::{create_session, me, update_me},
    admin::{list_users, set_role, set_status, stats},
    health::health,
    items::{create_item, item_detail, list_catalogue, my_items, request_item},
    payments::create_payment_intent,
    requests::{create_request, delete_request, my_requests, request_detail, update_request},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route("/items", get(list_catalogue))
        .route("/items/{item_id}", get(item_detail));

    let protected = Router::new()
        .route("/session", post(create_session))
        .route("/me", get(me).patch(update_me))
        .route("/my/items", get(my_items).post(create_item))
        .route("/my/requests", get(my_requests))
        .route("/items/{item_id}/request", patch(request_item))
        .route("/requests", post(create_request))
        .route(
            "/requests/{request_id}",
            get(request_detail)
                .patch(update_request)
                .delete(delete_request),
        )
        .route("/payments/intent", post(create_payment_intent))
        .route("/admin/users", get(list_users))
        .route("/admin/users/role", patch(set_role))
        .route("/admin/users/status", patch(set_status))
        .route("/admin/stats", get(stats));

    let protected = middleware::auth::access::apply(protected, state);

    public.merge(protected)
}
