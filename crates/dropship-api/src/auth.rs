//! Session validation for the deployment history routes.

use std::collections::HashMap;

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

/// Resolves a session token to a user id.
pub trait SessionValidator: Send + Sync {
    fn validate(&self, token: &str) -> Option<String>;
}

/// Fixed bearer tokens, as configured under `[auth] tokens`.
#[derive(Debug, Clone, Default)]
pub struct StaticSessions {
    tokens: HashMap<String, String>,
}

impl StaticSessions {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }
}

impl SessionValidator for StaticSessions {
    fn validate(&self, token: &str) -> Option<String> {
        self.tokens.get(token).cloned()
    }
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// User id for the request's session, if any.
pub fn authenticate(validator: &dyn SessionValidator, headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).and_then(|token| validator.validate(token))
}
