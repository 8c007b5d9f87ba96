// Checkout creation route.
//
// Thin boundary over the provider call: validate the user id, create the
// provider-hosted checkout session, hand back its URL. The completed
// checkout comes back asynchronously through the webhook route.

use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use slideworks_stripe::checkout::create_checkout_session;

/// Checkout creation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Checkout creation response.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Typed error for the checkout handler.
#[derive(Debug)]
pub enum CheckoutHandlerError {
    /// 400 — no user id in the request.
    MissingUserId,
    /// 500 — the provider call failed; carries the provider message.
    Provider(String),
}

impl std::fmt::Display for CheckoutHandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingUserId => write!(f, "User ID is required"),
            Self::Provider(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CheckoutHandlerError {}

/// Handle checkout-session creation.
pub async fn handle_create_checkout(
    ctx: &AppContext,
    body: CheckoutRequest,
) -> Result<CheckoutResponse, CheckoutHandlerError> {
    let Some(user_id) = body.user_id.filter(|id| !id.is_empty()) else {
        return Err(CheckoutHandlerError::MissingUserId);
    };

    let session = create_checkout_session(&ctx.stripe, &user_id)
        .await
        .map_err(|err| {
            ctx.logger.error(&format!("Checkout error: {err}"));
            CheckoutHandlerError::Provider(err.to_string())
        })?;

    Ok(CheckoutResponse { url: session.url })
}

#[cfg(test)]
mod tests {
    use super::*;
    use slideworks_core::options::ServiceOptions;
    use slideworks_memory::MemoryAdapter;
    use slideworks_stripe::StripeOptions;
    use std::sync::Arc;

    fn ctx() -> Arc<AppContext> {
        AppContext::new(
            ServiceOptions::new(),
            StripeOptions::new("whsec_test"),
            Arc::new(MemoryAdapter::new()),
        )
    }

    #[tokio::test]
    async fn missing_user_id_rejects() {
        let err = handle_create_checkout(&ctx(), CheckoutRequest { user_id: None })
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutHandlerError::MissingUserId));
        assert_eq!(err.to_string(), "User ID is required");
    }

    #[tokio::test]
    async fn empty_user_id_rejects() {
        let err = handle_create_checkout(
            &ctx(),
            CheckoutRequest {
                user_id: Some(String::new()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CheckoutHandlerError::MissingUserId));
    }

    #[tokio::test]
    async fn unconfigured_provider_is_surfaced() {
        // No secret key configured: the provider call fails before any I/O.
        let err = handle_create_checkout(
            &ctx(),
            CheckoutRequest {
                user_id: Some("user-1".into()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CheckoutHandlerError::Provider(_)));
    }
}
