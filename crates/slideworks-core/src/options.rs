// ServiceOptions — top-level configuration for the Slideworks server core.

use serde::{Deserialize, Serialize};

fn default_base_path() -> String {
    "/api".to_string()
}

fn default_media_bucket() -> String {
    "media".to_string()
}

fn default_max_slides() -> usize {
    10
}

fn default_title() -> String {
    "Untitled Carousel".to_string()
}

fn default_aspect() -> String {
    "square".to_string()
}

fn default_status() -> String {
    "draft".to_string()
}

/// Top-level configuration for the server core.
///
/// Everything has a default matching the hosted deployment; `from_env()`
/// overlays `SLIDEWORKS_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOptions {
    /// App name for log prefixes and diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    /// Path prefix for all API routes (default: "/api").
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// The single object-storage bucket carousel uploads may reference.
    #[serde(default = "default_media_bucket")]
    pub media_bucket: String,

    /// Hard cap on slides per carousel.
    #[serde(default = "default_max_slides")]
    pub max_slides: usize,

    /// Title used when the request omits one.
    #[serde(default = "default_title")]
    pub default_title: String,

    /// Aspect ratio written on every new carousel.
    #[serde(default = "default_aspect")]
    pub default_aspect: String,

    /// Status used when the request omits one.
    #[serde(default = "default_status")]
    pub default_status: String,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            app_name: None,
            base_path: default_base_path(),
            media_bucket: default_media_bucket(),
            max_slides: default_max_slides(),
            default_title: default_title(),
            default_aspect: default_aspect(),
            default_status: default_status(),
        }
    }
}

impl ServiceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from the environment, falling back to defaults.
    ///
    /// Recognized variables: `SLIDEWORKS_BASE_PATH`, `SLIDEWORKS_MEDIA_BUCKET`,
    /// `SLIDEWORKS_APP_NAME`.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(base_path) = std::env::var("SLIDEWORKS_BASE_PATH") {
            options.base_path = base_path;
        }
        if let Ok(bucket) = std::env::var("SLIDEWORKS_MEDIA_BUCKET") {
            options.media_bucket = bucket;
        }
        if let Ok(name) = std::env::var("SLIDEWORKS_APP_NAME") {
            options.app_name = Some(name);
        }
        options
    }
}
