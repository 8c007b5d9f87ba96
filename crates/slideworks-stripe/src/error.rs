//! Stripe integration errors.

use slideworks_core::StoreError;

#[derive(Debug)]
pub enum StripeError {
    /// Signature header missing a token, body not valid UTF-8, or MAC
    /// mismatch. Deliberately carries no detail about which check failed.
    SignatureInvalid,
    /// Event body parsed as JSON but the expected fields were absent.
    PayloadInvalid,
    /// A required provider setting is not configured.
    MissingConfig(&'static str),
    /// The provider API rejected a request.
    Provider(String),
    /// The provider API could not be reached.
    Http(String),
    /// The backing store failed while reconciling.
    Store(StoreError),
}

impl StripeError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::SignatureInvalid => "WEBHOOK_SIGNATURE_INVALID",
            Self::PayloadInvalid => "WEBHOOK_PAYLOAD_INVALID",
            Self::MissingConfig(_) => "STRIPE_CONFIG_MISSING",
            Self::Provider(_) => "STRIPE_API_ERROR",
            Self::Http(_) => "STRIPE_UNREACHABLE",
            Self::Store(_) => "STORE_ERROR",
        }
    }
}

impl std::fmt::Display for StripeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignatureInvalid => write!(f, "Invalid signature"),
            Self::PayloadInvalid => write!(f, "Invalid payload"),
            Self::MissingConfig(key) => write!(f, "Stripe configuration missing: {key}"),
            Self::Provider(msg) => write!(f, "{msg}"),
            Self::Http(msg) => write!(f, "Stripe request failed: {msg}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for StripeError {}

impl From<StoreError> for StripeError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
