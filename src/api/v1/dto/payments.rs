/*
 * Responsibility
 * - Payment intent の request/response DTO
 */
use serde::{Deserialize, Serialize};

/// Upper bound for a single donation, in minor units.
const MAX_AMOUNT_MINOR: i64 = 10_000_000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentRequest {
    /// Minor currency units (e.g. cents): 500 = $5.00.
    pub amount: i64,
}

impl PaymentIntentRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.amount <= 0 {
            return Err("amount must be positive");
        }
        if self.amount > MAX_AMOUNT_MINOR {
            return Err("amount is too large");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_bounds() {
        assert!(PaymentIntentRequest { amount: 0 }.validate().is_err());
        assert!(PaymentIntentRequest { amount: -5 }.validate().is_err());
        assert!(PaymentIntentRequest { amount: 500 }.validate().is_ok());
        assert!(
            PaymentIntentRequest {
                amount: MAX_AMOUNT_MINOR + 1
            }
            .validate()
            .is_err()
        );
    }
}
