/// Factory: build the process-wide `TokenVerifier` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{AuthService, TokenVerifier};

pub fn build_token_verifier(config: &Config) -> Result<Arc<dyn TokenVerifier>, AppError> {
    let auth = AuthService::new(
        &config.identity_jwt_public_key_pem,
        &config.auth_issuer,
        &config.auth_audience,
        config.access_token_leeway_seconds,
    )
    .map_err(|_| AppError::Internal)?;

    Ok(Arc::new(auth))
}
