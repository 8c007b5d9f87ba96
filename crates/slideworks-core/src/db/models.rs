// Model names for the tables this service touches. The schema itself is
// owned by the hosting platform; the column layout is documented here so
// handlers and tests agree on row shape.

/// The `carousel` table: one row per composed post.
///
/// Columns: `id`, `user_id`, `title`, `aspect`, `status`, `created_at`,
/// `updated_at`, `caption` (nullable, written by later edits).
pub const CAROUSEL: &str = "carousel";

/// The `media` table: one row per stored image asset.
///
/// Columns: `id`, `user_id`, `bucket`, `path`, `filename`, `mime_type`,
/// `size_bytes`, `media_type`, `visibility`, `is_library`. Rows created by
/// the carousel transaction are carousel-scoped (`is_library = false`);
/// library uploads set the flag and may outlive any carousel.
pub const MEDIA: &str = "media";

/// The `carousel_slide` table: one positioned reference from a carousel to
/// a media row.
///
/// Columns: `id`, `user_id`, `carousel_id`, `position`, `media_id`.
/// Positions per carousel are dense and 1-based.
pub const CAROUSEL_SLIDE: &str = "carousel_slide";

/// The `subscriptions` table, written only by the webhook reconciler.
///
/// Columns: `id`, `user_id`, `stripe_customer_id`, `stripe_subscription_id`,
/// `status`, `plan`, `current_period_end`. Updates are keyed by
/// `stripe_customer_id` because the payment provider only knows its own ids.
pub const SUBSCRIPTIONS: &str = "subscriptions";

/// The `session` table consulted by bearer authentication.
///
/// Columns: `token`, `user_id`, `expires_at` (nullable RFC 3339).
pub const SESSION: &str = "session";
