//! Checkout session creation against the provider HTTP API.

use crate::config::StripeOptions;
use crate::error::StripeError;
use crate::types::CheckoutSession;

/// Build the form parameters for a subscription checkout session.
///
/// `client_reference_id` and `metadata[user_id]` both carry the internal
/// user id; the webhook reconciler reads either back when the checkout
/// completes.
pub fn checkout_form_params(options: &StripeOptions, user_id: &str) -> Vec<(String, String)> {
    vec![
        ("mode".to_string(), "subscription".to_string()),
        ("line_items[0][price]".to_string(), options.price_id.clone()),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        (
            "success_url".to_string(),
            format!("{}/dashboard?session_id={{CHECKOUT_SESSION_ID}}", options.app_url),
        ),
        ("cancel_url".to_string(), format!("{}/profile", options.app_url)),
        ("client_reference_id".to_string(), user_id.to_string()),
        ("metadata[user_id]".to_string(), user_id.to_string()),
    ]
}

/// Create a checkout session for the given user and return its URL.
pub async fn create_checkout_session(
    options: &StripeOptions,
    user_id: &str,
) -> Result<CheckoutSession, StripeError> {
    if options.secret_key.is_empty() {
        return Err(StripeError::MissingConfig("STRIPE_SECRET_KEY"));
    }
    if options.price_id.is_empty() {
        return Err(StripeError::MissingConfig("STRIPE_PRICE_ID"));
    }

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/v1/checkout/sessions", options.api_base))
        .bearer_auth(&options.secret_key)
        .form(&checkout_form_params(options, user_id))
        .send()
        .await
        .map_err(|e| StripeError::Http(e.to_string()))?;

    let status = response.status();
    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| StripeError::Http(e.to_string()))?;

    if !status.is_success() {
        let message = body["error"]["message"]
            .as_str()
            .unwrap_or("Failed to create checkout session")
            .to_string();
        return Err(StripeError::Provider(message));
    }

    let url = body["url"]
        .as_str()
        .ok_or_else(|| StripeError::Provider("Checkout session has no URL".to_string()))?
        .to_string();

    Ok(CheckoutSession { url })
}
