//! Provider event payloads as typed structures.
//!
//! Field validation happens once at the boundary: an event deserializes into
//! [`WebhookEvent`], and the per-kind objects below are extracted from
//! `data.object` only for the kinds the reconciler acts on.

use serde::{Deserialize, Serialize};

/// A provider-emitted webhook event envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

/// Webhook event data wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEventData {
    pub object: serde_json::Value,
}

/// The checkout-session object carried by `checkout.session.completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSessionObject {
    /// The caller-supplied reference set when the session was created.
    #[serde(default)]
    pub client_reference_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<CheckoutMetadata>,
    /// The provider's customer identifier.
    #[serde(default)]
    pub customer: Option<String>,
    /// The provider's subscription identifier.
    #[serde(default)]
    pub subscription: Option<String>,
}

impl CheckoutSessionObject {
    /// Resolve the internal user id from the session, if the checkout
    /// carried one.
    pub fn resolve_user_id(&self) -> Option<String> {
        self.client_reference_id
            .clone()
            .filter(|id| !id.is_empty())
            .or_else(|| self.metadata.as_ref().and_then(|m| m.user_id.clone()))
            .filter(|id| !id.is_empty())
    }
}

/// Metadata attached to a checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutMetadata {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// The subscription object carried by `customer.subscription.*` events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionObject {
    /// The provider's customer identifier — the reconciliation key.
    pub customer: String,
    #[serde(default)]
    pub status: Option<String>,
    /// End of the current billing period, Unix seconds.
    #[serde(default)]
    pub current_period_end: Option<i64>,
}

/// A created checkout session, as returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
}
