//! Payment-provider client.
//!
//! One opaque call: create a payment intent for an amount in minor currency
//! units and hand the client secret back. No retries here; a provider failure
//! surfaces to the caller as a generic upstream error.

use async_trait::async_trait;
use serde::Deserialize;
use std::{error::Error as StdError, fmt};

#[derive(Debug)]
pub enum PaymentError {
    Http(reqwest::Error),
    Rejected { status: u16 },
}

impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "payment provider call failed: {}", e),
            Self::Rejected { status } => {
                write!(f, "payment provider rejected the request ({})", status)
            }
        }
    }
}

impl StdError for PaymentError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Rejected { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub client_secret: String,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// `amount_minor` is in minor currency units (e.g. cents). The caller has
    /// already validated it as positive.
    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError>;
}

pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    base_url: String,
}

impl StripeClient {
    pub fn new(secret_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            base_url: "https://api.stripe.com".to_string(),
        }
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        #[derive(Deserialize)]
        struct IntentResponse {
            client_secret: String,
        }

        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&[
                ("amount", amount_minor.to_string()),
                ("currency", currency.to_string()),
                ("payment_method_types[]", "card".to_string()),
            ])
            .send()
            .await
            .map_err(PaymentError::Http)?;

        if !response.status().is_success() {
            return Err(PaymentError::Rejected {
                status: response.status().as_u16(),
            });
        }

        let body: IntentResponse = response.json().await.map_err(PaymentError::Http)?;

        Ok(PaymentIntent {
            client_secret: body.client_secret,
        })
    }
}
