// OK/health route.

use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// Handle health check endpoint.
pub fn handle_ok() -> OkResponse {
    OkResponse { ok: true }
}
