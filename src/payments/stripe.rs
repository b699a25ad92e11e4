use async_trait::async_trait;
use failsafe::futures::CircuitBreaker as FuturesCircuitBreaker;
use failsafe::{backoff, failure_policy, Config, Error as FailsafeError, StateMachine};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{PaymentError, PaymentIntent, PaymentIntentRequest, PaymentProcessor};

/// API version pinned for request and webhook payload shapes.
pub const STRIPE_API_VERSION: &str = "2023-10-16";

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// HTTP client for the Stripe payment intents API
#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    base_url: String,
    secret_key: String,
    circuit_breaker: StateMachine<failure_policy::ConsecutiveFailures<backoff::EqualJittered>, ()>,
}

impl StripeClient {
    pub fn new(base_url: String, secret_key: String) -> Self {
        Self::with_circuit_breaker(base_url, secret_key, 3, 60)
    }

    pub fn with_circuit_breaker(
        base_url: String,
        secret_key: String,
        failure_threshold: u32,
        reset_timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        let backoff = backoff::equal_jittered(
            Duration::from_secs(reset_timeout_secs),
            Duration::from_secs(reset_timeout_secs * 2),
        );
        let policy = failure_policy::consecutive_failures(failure_threshold, backoff);
        let circuit_breaker = Config::new().failure_policy(policy).build();

        StripeClient {
            client,
            base_url,
            secret_key,
            circuit_breaker,
        }
    }

    fn form_params(request: &PaymentIntentRequest) -> Vec<(&'static str, String)> {
        vec![
            ("amount", request.amount.to_string()),
            ("currency", request.currency.clone()),
            ("description", request.description.clone()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
            ("metadata[orderId]", request.order_id.to_string()),
            ("metadata[scoutId]", request.scout_id.to_string()),
            ("metadata[scoutEmail]", request.scout_email.clone()),
        ]
    }
}

#[async_trait]
impl PaymentProcessor for StripeClient {
    async fn create_payment_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.base_url.trim_end_matches('/'));
        let client = self.client.clone();
        let secret_key = self.secret_key.clone();
        let params = Self::form_params(&request);

        let result = self
            .circuit_breaker
            .call(async move {
                let response = client
                    .post(&url)
                    .bearer_auth(&secret_key)
                    .header("Stripe-Version", STRIPE_API_VERSION)
                    .form(&params)
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    let message = match response.json::<StripeErrorBody>().await {
                        Ok(body) => body
                            .error
                            .message
                            .or(body.error.kind)
                            .unwrap_or_else(|| "unknown error".to_string()),
                        Err(_) => format!("HTTP {}", status),
                    };
                    return Err(PaymentError::Processor {
                        status: status.as_u16(),
                        message,
                    });
                }

                response
                    .json::<PaymentIntent>()
                    .await
                    .map_err(|e| PaymentError::InvalidResponse(e.to_string()))
            })
            .await;

        match result {
            Ok(intent) => Ok(intent),
            Err(FailsafeError::Rejected) => Err(PaymentError::CircuitBreakerOpen(
                "Payment processor circuit breaker is open".to_string(),
            )),
            Err(FailsafeError::Inner(e)) => Err(e),
        }
    }

    fn circuit_state(&self) -> String {
        if self.circuit_breaker.is_call_permitted() {
            "closed".to_string()
        } else {
            "open".to_string()
        }
    }
}
