//! Identity-provider token verification → `IdentityClaims`.
//!
//! The provider's signing/key-rotation protocol is not our problem: from this
//! side it is one opaque "verify token → claims" call against the configured
//! public key. A rejected token is never retried within a request; the caller
//! has to re-authenticate and resend.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::{error::Error as StdError, fmt};

// Errors returned by token verification + strict claim validation.
#[derive(Debug)]
pub enum TokenError {
    Jwt(jsonwebtoken::errors::Error),
    MissingOrInvalidAud,
    EmptyClaim(&'static str),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::MissingOrInvalidAud => write!(f, "missing or invalid 'aud' claim"),
            Self::EmptyClaim(name) => write!(f, "empty '{}' claim", name),
        }
    }
}

impl StdError for TokenError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

fn aud_is_present_and_valid(aud: &serde_json::Value) -> bool {
    match aud {
        // Typical: aud is a string
        serde_json::Value::String(s) => !s.trim().is_empty(),
        // Also valid: aud is an array of strings
        serde_json::Value::Array(arr) => arr.iter().any(|v| match v {
            serde_json::Value::String(s) => !s.trim().is_empty(),
            _ => false,
        }),
        // Missing claim ends up as Null due to #[serde(default)]
        _ => false,
    }
}

/// Raw identity-token claims.
///
/// NOTE:
/// - `aud` in JWT can be either string or array; jsonwebtoken validates it via
///   `Validation::set_audience`.
/// - `email` is what everything downstream keys on; display claims are
///   trust-level "display only" and never authorization-relevant.
#[derive(Debug, Clone, Deserialize)]
pub struct IdTokenClaims {
    pub iss: String,
    // Keep as Value to accept both string and array. Validation handles audience checks.
    #[serde(default)]
    pub aud: serde_json::Value,

    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// 検証済み・アプリ側で使う型
///
/// - `email` は account の join key (内部 surrogate id は信用しない)
/// - `subject` は provider 側の識別子 (ログ相関用)
#[derive(Debug, Clone)]
pub struct IdentityClaims {
    pub subject: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// The "verify token → claims" seam.
///
/// Production uses the JWT-backed `AuthService`; tests substitute a stub so
/// middleware behavior can be checked without a provider.
pub trait TokenVerifier: Send + Sync {
    fn verify_identity(&self, token: &str) -> Result<IdentityClaims, TokenError>;
}

pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    pub fn new(
        public_key_pem: &str,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Result<Self, TokenError> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    // Verify and decode an identity token.
    pub fn verify(&self, token: &str) -> Result<IdTokenClaims, jsonwebtoken::errors::Error> {
        let data =
            jsonwebtoken::decode::<IdTokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }

    /// Verify + strict claim validation.
    ///
    /// `jsonwebtoken::Validation` already checks:
    /// - signature
    /// - `exp` (with leeway)
    /// - `iss` and `aud` (because we set them)
    ///
    /// This method additionally checks that required claims are present
    /// *and not empty* (`iss`, `aud`, `sub`, `exp`, `email`).
    pub fn verify_strict(&self, token: &str) -> Result<IdTokenClaims, TokenError> {
        let claims = self.verify(token)?;

        if claims.iss.trim().is_empty() {
            return Err(TokenError::EmptyClaim("iss"));
        }
        if claims.sub.trim().is_empty() {
            return Err(TokenError::EmptyClaim("sub"));
        }
        if claims.exp == 0 {
            return Err(TokenError::EmptyClaim("exp"));
        }
        if !aud_is_present_and_valid(&claims.aud) {
            return Err(TokenError::MissingOrInvalidAud);
        }
        match claims.email.as_deref() {
            None => return Err(TokenError::EmptyClaim("email")),
            Some(email) if email.trim().is_empty() => {
                return Err(TokenError::EmptyClaim("email"));
            }
            Some(_) => {}
        }

        Ok(claims)
    }
}

impl TokenVerifier for AuthService {
    /// Verify + strict claim validation, then narrow into the application type.
    fn verify_identity(&self, token: &str) -> Result<IdentityClaims, TokenError> {
        let claims = self.verify_strict(token)?;

        // verify_strict guarantees a non-empty email.
        let email = claims.email.unwrap_or_default();

        Ok(IdentityClaims {
            subject: claims.sub,
            email,
            display_name: claims.name,
            photo_url: claims.picture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aud_accepts_string_and_array() {
        assert!(aud_is_present_and_valid(&serde_json::json!("my-app")));
        assert!(aud_is_present_and_valid(&serde_json::json!(["a", "b"])));
    }

    #[test]
    fn aud_rejects_missing_empty_and_wrong_types() {
        assert!(!aud_is_present_and_valid(&serde_json::Value::Null));
        assert!(!aud_is_present_and_valid(&serde_json::json!("")));
        assert!(!aud_is_present_and_valid(&serde_json::json!("   ")));
        assert!(!aud_is_present_and_valid(&serde_json::json!([])));
        assert!(!aud_is_present_and_valid(&serde_json::json!([42])));
        assert!(!aud_is_present_and_valid(&serde_json::json!(42)));
    }

    #[test]
    fn claims_tolerate_missing_display_fields() {
        let claims: IdTokenClaims = serde_json::from_value(serde_json::json!({
            "iss": "https://issuer.example",
            "aud": "my-app",
            "sub": "abc123",
            "exp": 4_102_444_800u64,
            "email": "donor@example.com"
        }))
        .unwrap();

        assert_eq!(claims.email.as_deref(), Some("donor@example.com"));
        assert!(claims.name.is_none());
        assert!(claims.picture.is_none());
    }
}
