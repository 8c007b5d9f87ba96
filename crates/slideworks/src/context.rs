// Request context — the fully-initialized service configuration shared
// across all request handlers as `Arc<AppContext>`.

use std::sync::Arc;

use slideworks_core::db::Adapter;
use slideworks_core::logger::AppLogger;
use slideworks_core::options::ServiceOptions;
use slideworks_stripe::StripeOptions;

/// Shared, read-only state for request handlers.
///
/// Created once at startup; handlers never hold mutable state of their own,
/// so concurrent requests only share this context and the store behind it.
pub struct AppContext {
    /// Service configuration.
    pub options: ServiceOptions,

    /// Payment provider configuration.
    pub stripe: StripeOptions,

    /// The store adapter for row-level reads and writes.
    pub adapter: Arc<dyn Adapter>,

    /// Structured service logger.
    pub logger: AppLogger,
}

// Manual Debug: never print provider secrets.
impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("options", &self.options)
            .field("stripe", &"[REDACTED]")
            .field("logger", &self.logger)
            .finish()
    }
}

impl AppContext {
    /// Create a new context with the default logger.
    pub fn new(
        options: ServiceOptions,
        stripe: StripeOptions,
        adapter: Arc<dyn Adapter>,
    ) -> Arc<Self> {
        Self::with_logger(options, stripe, adapter, AppLogger::default())
    }

    /// Create a new context with an explicit logger (tests capture output
    /// through a custom handler here).
    pub fn with_logger(
        options: ServiceOptions,
        stripe: StripeOptions,
        adapter: Arc<dyn Adapter>,
        logger: AppLogger,
    ) -> Arc<Self> {
        Arc::new(Self {
            options,
            stripe,
            adapter,
            logger,
        })
    }
}
