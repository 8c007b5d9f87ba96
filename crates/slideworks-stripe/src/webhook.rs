//! Webhook signature verification and subscription reconciliation.

use chrono::DateTime;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use slideworks_core::db::adapter::{Adapter, WhereClause};
use slideworks_core::db::models;
use slideworks_core::utils::id::generate_id;

use crate::config::StripeOptions;
use crate::error::StripeError;
use crate::types::{CheckoutSessionObject, SubscriptionObject, WebhookEvent};

type HmacSha256 = Hmac<Sha256>;

/// Verify a webhook signature header against the raw request body.
///
/// Header format: `t=<unix timestamp>,v1=<hex signature>`. The MAC input is
/// the exact wire bytes of the body prefixed with `<timestamp>.` — callers
/// must hand over the body before any JSON parsing or re-serialization.
pub fn verify_webhook_signature(
    payload: &[u8],
    signature_header: &str,
    webhook_secret: &str,
) -> Result<(), StripeError> {
    let parts: std::collections::HashMap<&str, &str> = signature_header
        .split(',')
        .filter_map(|part| {
            let mut kv = part.splitn(2, '=');
            Some((kv.next()?, kv.next()?))
        })
        .collect();

    let timestamp = parts.get("t").ok_or(StripeError::SignatureInvalid)?;
    let signature = parts.get("v1").ok_or(StripeError::SignatureInvalid)?;

    let body = std::str::from_utf8(payload).map_err(|_| StripeError::SignatureInvalid)?;
    let signed_payload = format!("{timestamp}.{body}");

    let mut mac = HmacSha256::new_from_slice(webhook_secret.as_bytes())
        .map_err(|_| StripeError::SignatureInvalid)?;
    mac.update(signed_payload.as_bytes());

    let expected = hex::encode(mac.finalize().into_bytes());

    if expected.as_bytes().ct_eq(signature.as_bytes()).into() {
        Ok(())
    } else {
        Err(StripeError::SignatureInvalid)
    }
}

/// What the reconciler did with a verified event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// A checkout completed and the user's subscription row now reflects it.
    SubscriptionActivated { user_id: String },
    /// Subscription rows matching the customer id were updated.
    SubscriptionUpdated { matched: i64 },
    /// Subscription rows matching the customer id were downgraded.
    SubscriptionCanceled { matched: i64 },
    /// A handled kind arrived without the fields needed to act; acknowledged.
    Skipped,
    /// An event kind outside the handled set; acknowledged.
    Ignored,
}

/// Apply a verified event to the subscriptions table.
///
/// Every transition is keyed on identifiers the provider supplies
/// (`stripe_customer_id`, or the user id echoed back through the checkout
/// session), never on internal primary keys. Transitions are last-write-wins;
/// delivery order is not defended beyond that.
pub async fn apply_event(
    adapter: &dyn Adapter,
    options: &StripeOptions,
    event: &WebhookEvent,
) -> Result<WebhookOutcome, StripeError> {
    match event.event_type.as_str() {
        "checkout.session.completed" => {
            let session: CheckoutSessionObject =
                serde_json::from_value(event.data.object.clone())
                    .map_err(|_| StripeError::PayloadInvalid)?;

            let Some(user_id) = session.resolve_user_id() else {
                // A checkout with no user reference is acknowledged untouched.
                return Ok(WebhookOutcome::Skipped);
            };

            let fields = json!({
                "user_id": user_id,
                "stripe_customer_id": session.customer,
                "stripe_subscription_id": session.subscription,
                "status": "active",
                "plan": options.premium_plan,
            });

            // Upsert by user id so a replayed event converges to one row.
            let existing = adapter
                .update(models::SUBSCRIPTIONS, &[WhereClause::eq("user_id", user_id.clone())], fields.clone())
                .await?;
            if existing.is_none() {
                let mut row = fields;
                row["id"] = json!(generate_id());
                adapter.create(models::SUBSCRIPTIONS, row).await?;
            }

            Ok(WebhookOutcome::SubscriptionActivated { user_id })
        }

        "customer.subscription.updated" => {
            let subscription: SubscriptionObject =
                serde_json::from_value(event.data.object.clone())
                    .map_err(|_| StripeError::PayloadInvalid)?;
            let status = subscription.status.ok_or(StripeError::PayloadInvalid)?;

            let mut fields = json!({ "status": status });
            if let Some(period_end) = subscription
                .current_period_end
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
            {
                fields["current_period_end"] = json!(period_end.to_rfc3339());
            }

            let matched = adapter
                .update_many(
                    models::SUBSCRIPTIONS,
                    &[WhereClause::eq("stripe_customer_id", subscription.customer)],
                    fields,
                )
                .await?;

            Ok(WebhookOutcome::SubscriptionUpdated { matched })
        }

        "customer.subscription.deleted" => {
            let subscription: SubscriptionObject =
                serde_json::from_value(event.data.object.clone())
                    .map_err(|_| StripeError::PayloadInvalid)?;

            let matched = adapter
                .update_many(
                    models::SUBSCRIPTIONS,
                    &[WhereClause::eq("stripe_customer_id", subscription.customer)],
                    json!({
                        "status": "canceled",
                        "plan": options.free_plan,
                    }),
                )
                .await?;

            Ok(WebhookOutcome::SubscriptionCanceled { matched })
        }

        _ => Ok(WebhookOutcome::Ignored),
    }
}

/// Event kinds the reconciler acts on.
pub const HANDLED_EVENTS: &[&str] = &[
    "checkout.session.completed",
    "customer.subscription.updated",
    "customer.subscription.deleted",
];

/// Check whether an event kind causes a state transition.
pub fn is_handled_event(event_type: &str) -> bool {
    HANDLED_EVENTS.contains(&event_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(payload: &[u8], secret: &str, timestamp: &str) -> String {
        let signed = format!("{timestamp}.{}", std::str::from_utf8(payload).unwrap());
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(signed.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_verifies() {
        let secret = "whsec_test_secret";
        let payload = b"{\"type\":\"test\"}";
        let timestamp = "1614556800";

        let sig = sign(payload, secret, timestamp);
        let header = format!("t={timestamp},v1={sig}");
        assert!(verify_webhook_signature(payload, &header, secret).is_ok());
    }

    #[test]
    fn mutated_body_rejects() {
        let secret = "whsec_test_secret";
        let payload = b"{\"type\":\"test\"}";
        let timestamp = "1614556800";

        let sig = sign(payload, secret, timestamp);
        let header = format!("t={timestamp},v1={sig}");
        let mutated = b"{\"type\":\"tesT\"}";
        assert!(verify_webhook_signature(mutated, &header, secret).is_err());
    }

    #[test]
    fn missing_timestamp_rejects() {
        assert!(verify_webhook_signature(b"payload", "v1=abc", "secret").is_err());
    }

    #[test]
    fn missing_signature_rejects() {
        assert!(verify_webhook_signature(b"payload", "t=123", "secret").is_err());
    }

    #[test]
    fn empty_header_rejects() {
        assert!(verify_webhook_signature(b"payload", "", "secret").is_err());
    }

    #[test]
    fn wrong_secret_rejects() {
        let payload = b"{}";
        let timestamp = "1700000000";
        let sig = sign(payload, "secret-a", timestamp);
        let header = format!("t={timestamp},v1={sig}");
        assert!(verify_webhook_signature(payload, &header, "secret-b").is_err());
    }

    #[test]
    fn handled_events_set() {
        assert!(is_handled_event("checkout.session.completed"));
        assert!(is_handled_event("customer.subscription.updated"));
        assert!(is_handled_event("customer.subscription.deleted"));
        assert!(!is_handled_event("invoice.paid"));
        assert!(!is_handled_event(""));
    }
}
