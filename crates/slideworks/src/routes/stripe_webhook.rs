// Payment webhook route.
//
// The signature gate runs over the exact wire bytes of the body; only a
// verified payload is parsed and handed to the reconciler. Any verified
// event — handled, skipped, or outside the handled set — is acknowledged
// with a 200 so the provider stops redelivering it.

use serde::Serialize;

use crate::context::AppContext;
use slideworks_stripe::webhook::{apply_event, verify_webhook_signature, WebhookOutcome};
use slideworks_stripe::{StripeError, WebhookEvent};

/// Acknowledgement body returned for every verified event.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// Typed error for the webhook handler.
///
/// Signature problems are deliberately vague: the response never says which
/// check failed.
#[derive(Debug)]
pub enum WebhookHandlerError {
    /// 400 — no signature header, or no secret configured to check it with.
    MissingSignature,
    /// 400 — the signature did not verify.
    InvalidSignature,
    /// 400 — verified body that does not parse as a provider event.
    InvalidPayload,
    /// 500 — reconciliation failed for an internal reason (logged).
    Internal(String),
}

impl std::fmt::Display for WebhookHandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSignature => write!(f, "Missing signature or webhook secret"),
            Self::InvalidSignature => write!(f, "Invalid signature"),
            Self::InvalidPayload => write!(f, "Invalid payload"),
            Self::Internal(_) => write!(f, "Internal server error"),
        }
    }
}

impl std::error::Error for WebhookHandlerError {}

/// Handle an inbound provider webhook.
///
/// `payload` must be the raw request body bytes, captured before any JSON
/// parsing — re-serialization changes the byte sequence and invalidates
/// the signature.
pub async fn handle_stripe_webhook(
    ctx: &AppContext,
    signature: Option<&str>,
    payload: &[u8],
) -> Result<WebhookAck, WebhookHandlerError> {
    let secret = &ctx.stripe.webhook_secret;
    if secret.is_empty() {
        return Err(WebhookHandlerError::MissingSignature);
    }
    let Some(signature) = signature.filter(|s| !s.is_empty()) else {
        return Err(WebhookHandlerError::MissingSignature);
    };

    verify_webhook_signature(payload, signature, secret)
        .map_err(|_| WebhookHandlerError::InvalidSignature)?;

    let event: WebhookEvent =
        serde_json::from_slice(payload).map_err(|_| WebhookHandlerError::InvalidPayload)?;

    match apply_event(ctx.adapter.as_ref(), &ctx.stripe, &event).await {
        Ok(outcome) => {
            log_outcome(ctx, &event, &outcome);
            Ok(WebhookAck { received: true })
        }
        Err(StripeError::PayloadInvalid) => Err(WebhookHandlerError::InvalidPayload),
        Err(err) => {
            ctx.logger.error(&format!(
                "Webhook error for {}: {err}",
                event.id.as_deref().unwrap_or("<no id>")
            ));
            Err(WebhookHandlerError::Internal(err.to_string()))
        }
    }
}

fn log_outcome(ctx: &AppContext, event: &WebhookEvent, outcome: &WebhookOutcome) {
    let event_id = event.id.as_deref().unwrap_or("<no id>");
    match outcome {
        WebhookOutcome::SubscriptionActivated { user_id } => ctx
            .logger
            .info(&format!("{event_id}: subscription activated for user {user_id}")),
        WebhookOutcome::SubscriptionUpdated { matched } => ctx
            .logger
            .info(&format!("{event_id}: subscription updated ({matched} rows)")),
        WebhookOutcome::SubscriptionCanceled { matched } => ctx
            .logger
            .info(&format!("{event_id}: subscription canceled ({matched} rows)")),
        WebhookOutcome::Skipped => ctx
            .logger
            .warn(&format!("{event_id}: checkout completed without a user reference, skipped")),
        WebhookOutcome::Ignored => ctx
            .logger
            .debug(&format!("{event_id}: unhandled event type {}", event.event_type)),
    }
}
