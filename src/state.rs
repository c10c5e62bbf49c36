/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::{auth::TokenVerifier, id_codec::IdCodec, payments::PaymentProvider};

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub id_codec: IdCodec,
    pub auth: Arc<dyn TokenVerifier>,
    pub payments: Arc<dyn PaymentProvider>,
    pub payment_currency: String,
}

impl AppState {
    pub fn new(
        db: sqlx::PgPool,
        id_codec: IdCodec,
        auth: Arc<dyn TokenVerifier>,
        payments: Arc<dyn PaymentProvider>,
        payment_currency: String,
    ) -> Self {
        Self {
            db,
            id_codec,
            auth,
            payments,
            payment_currency,
        }
    }
}
