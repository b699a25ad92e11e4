pub mod signature;
pub mod stripe;
pub mod webhook;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use stripe::StripeClient;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Payment processor rejected the request ({status}): {message}")]
    Processor { status: u16, message: String },
    #[error("Invalid response from payment processor: {0}")]
    InvalidResponse(String),
    #[error("Circuit breaker open: {0}")]
    CircuitBreakerOpen(String),
}

/// What the checkout flow asks the processor for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentRequest {
    /// Amount in minor currency units.
    pub amount: i64,
    pub currency: String,
    pub order_id: Uuid,
    pub scout_id: Uuid,
    pub scout_email: String,
    pub description: String,
}

/// The processor's handle for an in-progress charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
}

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn create_payment_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError>;

    /// `closed` while calls are permitted, `open` while they are short-circuited.
    fn circuit_state(&self) -> String {
        "closed".to_string()
    }
}
