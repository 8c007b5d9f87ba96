//! # slideworks
//!
//! The Slideworks server core: request context, bearer-identity resolution,
//! and the route handlers for carousel creation and billing.
//!
//! Handlers are pure functions over an [`AppContext`](context::AppContext)
//! and a typed request body; the HTTP surface lives in `slideworks-axum`.

pub mod auth;
pub mod context;
pub mod routes;
