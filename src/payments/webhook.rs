//! Webhook event envelope and the subset of event types that move an order.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::order::OrderStatus;

pub const PAYMENT_SUCCEEDED: &str = "payment_intent.succeeded";
pub const PAYMENT_FAILED: &str = "payment_intent.payment_failed";

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: EventData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub object: EventObject,
}

/// Only the object id is read, and only for payment intent events.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventObject {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// A status change for the order holding this payment intent id.
    Transition {
        payment_intent_id: String,
        status: OrderStatus,
    },
    Ignored,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("{0} event carries no payment intent id")]
pub struct MissingIntentId(pub String);

impl WebhookEvent {
    pub fn outcome(&self) -> Result<PaymentOutcome, MissingIntentId> {
        let status = match self.event_type.as_str() {
            PAYMENT_SUCCEEDED => OrderStatus::Paid,
            PAYMENT_FAILED => OrderStatus::Failed,
            _ => return Ok(PaymentOutcome::Ignored),
        };
        let payment_intent_id = self
            .data
            .object
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| MissingIntentId(self.event_type.clone()))?;

        Ok(PaymentOutcome::Transition {
            payment_intent_id,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(event_type: &str) -> WebhookEvent {
        serde_json::from_value(serde_json::json!({
            "id": "evt_1",
            "object": "event",
            "type": event_type,
            "data": { "object": { "id": "pi_123", "object": "payment_intent", "amount": 1500 } }
        }))
        .unwrap()
    }

    #[test]
    fn test_succeeded_maps_to_paid() {
        assert_eq!(
            event(PAYMENT_SUCCEEDED).outcome(),
            Ok(PaymentOutcome::Transition {
                payment_intent_id: "pi_123".to_string(),
                status: OrderStatus::Paid
            })
        );
    }

    #[test]
    fn test_failed_maps_to_failed() {
        assert_eq!(
            event(PAYMENT_FAILED).outcome(),
            Ok(PaymentOutcome::Transition {
                payment_intent_id: "pi_123".to_string(),
                status: OrderStatus::Failed
            })
        );
    }

    #[test]
    fn test_other_types_are_ignored() {
        assert_eq!(event("charge.refunded").outcome(), Ok(PaymentOutcome::Ignored));
        assert_eq!(event("payment_intent.created").outcome(), Ok(PaymentOutcome::Ignored));
    }

    #[test]
    fn test_unknown_type_without_object_id_is_ignored() {
        let event: WebhookEvent = serde_json::from_value(serde_json::json!({
            "id": "evt_2",
            "type": "balance.available",
            "data": { "object": { "object": "balance", "available": [] } }
        }))
        .unwrap();
        assert_eq!(event.outcome(), Ok(PaymentOutcome::Ignored));

        let bare: WebhookEvent =
            serde_json::from_value(serde_json::json!({ "type": "account.updated" })).unwrap();
        assert_eq!(bare.outcome(), Ok(PaymentOutcome::Ignored));
    }

    #[test]
    fn test_payment_event_requires_object_id() {
        let event: WebhookEvent = serde_json::from_value(serde_json::json!({
            "type": PAYMENT_SUCCEEDED,
            "data": { "object": { "object": "payment_intent" } }
        }))
        .unwrap();
        assert_eq!(
            event.outcome(),
            Err(MissingIntentId(PAYMENT_SUCCEEDED.to_string()))
        );
    }
}
