//! Stripe configuration.

use serde::{Deserialize, Serialize};

fn default_api_base() -> String {
    "https://api.stripe.com".to_string()
}

fn default_app_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_premium_plan() -> String {
    "premium".to_string()
}

fn default_free_plan() -> String {
    "free".to_string()
}

/// Stripe integration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeOptions {
    /// Webhook signing secret shared with the provider.
    pub webhook_secret: String,
    /// API secret key used for outbound provider calls.
    #[serde(default)]
    pub secret_key: String,
    /// Price id for the subscription checkout line item.
    #[serde(default)]
    pub price_id: String,
    /// Application URL used to build success/cancel redirect targets.
    #[serde(default = "default_app_url")]
    pub app_url: String,
    /// Provider API base URL. Overridden in tests.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Plan written when a checkout completes.
    #[serde(default = "default_premium_plan")]
    pub premium_plan: String,
    /// Plan written when a subscription is deleted.
    #[serde(default = "default_free_plan")]
    pub free_plan: String,
}

impl StripeOptions {
    /// Build options with just a webhook secret; everything else defaulted.
    pub fn new(webhook_secret: impl Into<String>) -> Self {
        Self {
            webhook_secret: webhook_secret.into(),
            secret_key: String::new(),
            price_id: String::new(),
            app_url: default_app_url(),
            api_base: default_api_base(),
            premium_plan: default_premium_plan(),
            free_plan: default_free_plan(),
        }
    }

    /// Build options from the environment.
    ///
    /// Recognized variables: `STRIPE_WEBHOOK_SECRET`, `STRIPE_SECRET_KEY`,
    /// `STRIPE_PRICE_ID`, `SLIDEWORKS_URL`.
    pub fn from_env() -> Self {
        let mut options = Self::new(std::env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default());
        if let Ok(key) = std::env::var("STRIPE_SECRET_KEY") {
            options.secret_key = key;
        }
        if let Ok(price) = std::env::var("STRIPE_PRICE_ID") {
            options.price_id = price;
        }
        if let Ok(url) = std::env::var("SLIDEWORKS_URL") {
            options.app_url = url;
        }
        options
    }
}
