// Bearer-identity resolution.
//
// Session issuance and refresh live elsewhere; this module only answers
// "which user is making this request" for the authenticated endpoints.
// A bearer token maps to a `session` row; unknown or expired tokens fail.

use crate::context::AppContext;
use slideworks_core::db::models;
use slideworks_core::db::WhereClause;

/// Authentication failure, surfaced before any other processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No Authorization header, or one without a bearer credential.
    Missing,
    /// The bearer token resolved to no live session.
    Failed,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing => "auth_missing",
            Self::Failed => "auth_failed",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "Missing or invalid Authorization header"),
            Self::Failed => write!(f, "Unauthorized"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Extract the bearer token from an Authorization header value.
fn bearer_token(authorization: Option<&str>) -> Result<&str, AuthError> {
    let value = authorization.ok_or(AuthError::Missing)?;
    let (scheme, token) = value.split_once(' ').ok_or(AuthError::Missing)?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::Missing);
    }
    Ok(token)
}

/// Resolve the caller identity from an Authorization header.
pub async fn resolve_bearer(
    ctx: &AppContext,
    authorization: Option<&str>,
) -> Result<String, AuthError> {
    let token = bearer_token(authorization)?;

    let session = ctx
        .adapter
        .find_one(models::SESSION, &[WhereClause::eq("token", token)])
        .await
        .map_err(|_| AuthError::Failed)?
        .ok_or(AuthError::Failed)?;

    if let Some(expires_at) = session.get("expires_at").and_then(|v| v.as_str()) {
        let expiry = chrono::DateTime::parse_from_rfc3339(expires_at)
            .map_err(|_| AuthError::Failed)?;
        if expiry < chrono::Utc::now() {
            return Err(AuthError::Failed);
        }
    }

    session
        .get("user_id")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or(AuthError::Failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use slideworks_core::db::Adapter;
    use slideworks_core::options::ServiceOptions;
    use slideworks_memory::MemoryAdapter;
    use slideworks_stripe::StripeOptions;
    use std::sync::Arc;

    async fn ctx_with_sessions(rows: Vec<serde_json::Value>) -> Arc<AppContext> {
        let adapter = MemoryAdapter::new();
        for row in rows {
            adapter.create(models::SESSION, row).await.unwrap();
        }
        AppContext::new(
            ServiceOptions::new(),
            StripeOptions::new("whsec_test"),
            Arc::new(adapter),
        )
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc")).unwrap(), "abc");
        assert_eq!(bearer_token(Some("bearer abc")).unwrap(), "abc");
        assert_eq!(bearer_token(None).unwrap_err(), AuthError::Missing);
        assert_eq!(bearer_token(Some("Basic abc")).unwrap_err(), AuthError::Missing);
        assert_eq!(bearer_token(Some("Bearer ")).unwrap_err(), AuthError::Missing);
        assert_eq!(bearer_token(Some("token-without-scheme")).unwrap_err(), AuthError::Missing);
    }

    #[tokio::test]
    async fn resolves_user_from_live_session() {
        let ctx = ctx_with_sessions(vec![json!({
            "token": "tok-1",
            "user_id": "123",
        })])
        .await;

        let user = resolve_bearer(&ctx, Some("Bearer tok-1")).await.unwrap();
        assert_eq!(user, "123");
    }

    #[tokio::test]
    async fn unknown_token_fails() {
        let ctx = ctx_with_sessions(vec![]).await;
        let err = resolve_bearer(&ctx, Some("Bearer nope")).await.unwrap_err();
        assert_eq!(err, AuthError::Failed);
    }

    #[tokio::test]
    async fn expired_session_fails() {
        let ctx = ctx_with_sessions(vec![json!({
            "token": "tok-old",
            "user_id": "123",
            "expires_at": "2020-01-01T00:00:00+00:00",
        })])
        .await;

        let err = resolve_bearer(&ctx, Some("Bearer tok-old")).await.unwrap_err();
        assert_eq!(err, AuthError::Failed);
    }

    #[tokio::test]
    async fn session_without_expiry_never_expires() {
        let ctx = ctx_with_sessions(vec![json!({
            "token": "tok-2",
            "user_id": "456",
        })])
        .await;

        assert_eq!(resolve_bearer(&ctx, Some("Bearer tok-2")).await.unwrap(), "456");
    }
}
