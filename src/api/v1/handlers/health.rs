/*
 * Responsibility
 * - liveness 確認 (依存には触らない)
 */
use axum::Json;
use serde_json::{Value, json};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
