//! # slideworks-axum
//!
//! Axum HTTP surface for the Slideworks server core.
//!
//! Routes (nested under the configured base path, default `/api`):
//! - `POST /carousels` — bearer-authenticated carousel creation
//! - `POST /stripe/webhook` — signed provider webhook
//! - `POST /stripe/checkout` — checkout session creation
//! - `GET /ok` — health probe
//!
//! The whole router carries a permissive CORS layer; preflight requests are
//! answered by the layer without reaching a handler.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use slideworks::auth::{self, AuthError};
use slideworks::context::AppContext;
use slideworks::routes;
use slideworks::routes::checkout::CheckoutHandlerError;
use slideworks::routes::create_carousel::CreateCarouselError;
use slideworks::routes::stripe_webhook::WebhookHandlerError;
use slideworks_core::db::Adapter;
use slideworks_core::options::ServiceOptions;
use slideworks_stripe::StripeOptions;

// ─── Error Handling ──────────────────────────────────────────────

/// API error with HTTP status, optional machine-readable code, and a
/// human-readable message. The creation endpoint carries a `code`; the
/// billing endpoints return a bare `{ error }` envelope.
struct ApiError {
    status: StatusCode,
    code: Option<&'static str>,
    message: String,
}

impl ApiError {
    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: None,
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.code {
            Some(code) => serde_json::json!({ "error": self.message, "code": code }),
            None => serde_json::json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: Some(err.code()),
            message: err.to_string(),
        }
    }
}

impl From<CreateCarouselError> for ApiError {
    fn from(err: CreateCarouselError) -> Self {
        let status = match err {
            CreateCarouselError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            code: Some(err.code()),
            message: err.to_string(),
        }
    }
}

impl From<WebhookHandlerError> for ApiError {
    fn from(err: WebhookHandlerError) -> Self {
        let status = match err {
            WebhookHandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            code: None,
            message: err.to_string(),
        }
    }
}

impl From<CheckoutHandlerError> for ApiError {
    fn from(err: CheckoutHandlerError) -> Self {
        let status = match err {
            CheckoutHandlerError::MissingUserId => StatusCode::BAD_REQUEST,
            CheckoutHandlerError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            code: None,
            message: err.to_string(),
        }
    }
}

// ─── Builder ─────────────────────────────────────────────────────

/// The entry point for serving Slideworks over Axum.
///
/// # Example
///
/// ```rust,ignore
/// use slideworks_axum::Slideworks;
/// use slideworks_core::options::ServiceOptions;
/// use slideworks_stripe::StripeOptions;
///
/// let app = Slideworks::new(
///     ServiceOptions::from_env(),
///     StripeOptions::from_env(),
///     adapter,
/// );
/// axum::serve(listener, app.router()).await?;
/// ```
pub struct Slideworks {
    ctx: Arc<AppContext>,
}

impl Slideworks {
    /// Create a new instance from options and a store adapter.
    pub fn new(options: ServiceOptions, stripe: StripeOptions, adapter: Arc<dyn Adapter>) -> Self {
        let ctx = AppContext::new(options, stripe, adapter);
        Self { ctx }
    }

    /// Create from an existing `AppContext`.
    pub fn from_context(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Get a reference to the app context.
    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    /// Build the Axum `Router`, nested under the configured base path,
    /// with the permissive CORS layer applied.
    pub fn router(&self) -> Router {
        let base_path = self.ctx.options.base_path.clone();

        let api_routes = Router::new()
            .route("/ok", get(handle_ok))
            .route("/carousels", post(handle_create_carousel))
            .route("/stripe/webhook", post(handle_stripe_webhook))
            .route("/stripe/checkout", post(handle_create_checkout))
            .with_state(self.ctx.clone());

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any);

        Router::new().nest(&base_path, api_routes).layer(cors)
    }
}

// ─── Route Handlers ─────────────────────────────────────────────

async fn handle_ok() -> impl IntoResponse {
    Json(routes::ok::handle_ok())
}

async fn handle_create_carousel(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let user_id = match auth::resolve_bearer(&ctx, authorization).await {
        Ok(user_id) => user_id,
        Err(err) => return ApiError::from(err).into_response(),
    };

    // An unparseable body is an unexpected failure, not a validation one:
    // the client bypassed the typed SDK entirely.
    let body: routes::create_carousel::CreateCarouselRequest = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(err) => {
            ctx.logger.error(&format!("Unreadable carousel request body: {err}"));
            return ApiError::from(CreateCarouselError::Internal(err.to_string())).into_response();
        }
    };

    match routes::create_carousel::handle_create_carousel(&ctx, &user_id, body).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn handle_stripe_webhook(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok());

    match routes::stripe_webhook::handle_stripe_webhook(&ctx, signature, &body).await {
        Ok(ack) => Json(ack).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn handle_create_checkout(State(ctx): State<Arc<AppContext>>, body: Bytes) -> Response {
    let body: routes::checkout::CheckoutRequest = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(err) => {
            ctx.logger.error(&format!("Unreadable checkout request body: {err}"));
            return ApiError::internal().into_response();
        }
    };

    match routes::checkout::handle_create_checkout(&ctx, body).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}
