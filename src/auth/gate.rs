//! Per-request authentication gate.
//!
//! ```text
//! START ── (method, path) in allowlist ──────────────► BYPASSED
//! START ── no "Authorization: Bearer …" header ──────► REJECTED (401)
//!       ── token fails verification ─────────────────► REJECTED (401)
//!       ── token verifies ───────────────────────────► AUTHENTICATED
//! ```
//!
//! The decision is pure CPU work: no I/O, no server-side session. Every
//! request re-derives its principal from the token alone, so any instance
//! sharing the signing secret can serve any request.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::{Principal, TokenService};
use crate::error::ApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// A path pattern matched segment by segment. A `{name}` segment matches
/// any single non-empty segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    segments: Vec<String>,
}

impl RoutePattern {
    /// Parses a pattern such as `/users/{id}`.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        Self {
            segments: split_path(pattern).map(str::to_string).collect(),
        }
    }

    /// Returns `true` if `path` matches this pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let mut parts = split_path(path);
        for expected in &self.segments {
            let Some(actual) = parts.next() else {
                return false;
            };
            let wildcard = expected.starts_with('{') && expected.ends_with('}');
            if !wildcard && expected != actual {
                return false;
            }
        }
        parts.next().is_none()
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Explicit set of `(method, path pattern)` pairs that skip token checks.
#[derive(Debug, Clone, Default)]
pub struct PublicAllowlist {
    entries: Vec<(Method, RoutePattern)>,
}

impl PublicAllowlist {
    /// Creates an empty allowlist: every route requires a token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registration, login and health check.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .allow(Method::POST, "/users")
            .allow(Method::POST, "/auth/login")
            .allow(Method::GET, "/health")
    }

    /// Adds a public route.
    #[must_use]
    pub fn allow(mut self, method: Method, pattern: &str) -> Self {
        self.entries.push((method, RoutePattern::new(pattern)));
        self
    }

    /// Returns `true` if the request may proceed without a token.
    #[must_use]
    pub fn permits(&self, method: &Method, path: &str) -> bool {
        self.entries
            .iter()
            .any(|(m, pattern)| m == method && pattern.matches(path))
    }
}

/// Why a request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No `Authorization` header, or not the `Bearer` scheme.
    MissingToken,
    /// Token present but malformed, badly signed or expired.
    InvalidToken,
}

/// Outcome of classifying one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Public route; no principal.
    Bypassed,
    /// Token verified; the principal to attach.
    Authenticated(Principal),
    /// Short-circuit with 401.
    Rejected(RejectReason),
}

/// The authentication gate: token service plus public allowlist.
#[derive(Debug, Clone)]
pub struct AuthGate {
    tokens: Arc<TokenService>,
    allowlist: PublicAllowlist,
}

impl AuthGate {
    /// Creates a gate.
    #[must_use]
    pub fn new(tokens: Arc<TokenService>, allowlist: PublicAllowlist) -> Self {
        Self { tokens, allowlist }
    }

    /// The token service used for verification.
    #[must_use]
    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// Classifies a request. The allowlist is consulted before any header
    /// is looked at.
    #[must_use]
    pub fn classify(&self, method: &Method, path: &str, headers: &HeaderMap) -> GateDecision {
        if self.allowlist.permits(method, path) {
            return GateDecision::Bypassed;
        }
        let Some(token) = bearer_token(headers) else {
            return GateDecision::Rejected(RejectReason::MissingToken);
        };
        match self.tokens.subject_of(token) {
            Ok(subject) => GateDecision::Authenticated(Principal::new(subject)),
            Err(err) => {
                tracing::debug!(reason = %err, "bearer token rejected");
                GateDecision::Rejected(RejectReason::InvalidToken)
            }
        }
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Axum middleware applying [`AuthGate::classify`].
///
/// On rejection the inner handler is never invoked. On success the
/// [`Principal`] is inserted into the request extensions.
pub async fn require_authentication(
    State(gate): State<Arc<AuthGate>>,
    mut request: Request,
    next: Next,
) -> Response {
    let decision = gate.classify(request.method(), request.uri().path(), request.headers());
    match decision {
        GateDecision::Bypassed => next.run(request).await,
        GateDecision::Authenticated(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        GateDecision::Rejected(reason) => {
            tracing::debug!(
                ?reason,
                method = %request.method(),
                path = request.uri().path(),
                "request rejected by auth gate"
            );
            ApiError::Unauthenticated.into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn gate() -> AuthGate {
        let Ok(tokens) = TokenService::new("gate-test-secret-0123456789abcdef") else {
            panic!("valid secret");
        };
        AuthGate::new(Arc::new(tokens), PublicAllowlist::standard())
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) else {
            panic!("valid header");
        };
        headers.insert(header::AUTHORIZATION, value);
        headers
    }

    #[test]
    fn pattern_matches_segments() {
        let pattern = RoutePattern::new("/users/{id}");
        assert!(pattern.matches("/users/abc"));
        assert!(pattern.matches("/users/abc/"));
        assert!(!pattern.matches("/users"));
        assert!(!pattern.matches("/users/abc/albums"));
        assert!(!pattern.matches("/accounts/abc"));
    }

    #[test]
    fn public_routes_bypass_without_header() {
        let gate = gate();
        let headers = HeaderMap::new();
        assert_eq!(
            gate.classify(&Method::POST, "/users", &headers),
            GateDecision::Bypassed
        );
        assert_eq!(
            gate.classify(&Method::POST, "/auth/login", &headers),
            GateDecision::Bypassed
        );
    }

    #[test]
    fn allowlist_is_method_specific() {
        let gate = gate();
        assert_eq!(
            gate.classify(&Method::GET, "/users", &HeaderMap::new()),
            GateDecision::Rejected(RejectReason::MissingToken)
        );
    }

    #[test]
    fn public_route_ignores_invalid_header() {
        let gate = gate();
        assert_eq!(
            gate.classify(&Method::POST, "/users", &bearer("garbage")),
            GateDecision::Bypassed
        );
    }

    #[test]
    fn missing_or_non_bearer_header_is_rejected() {
        let gate = gate();
        let mut basic = HeaderMap::new();
        basic.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        for headers in [HeaderMap::new(), basic, bearer("")] {
            assert_eq!(
                gate.classify(&Method::GET, "/users/1", &headers),
                GateDecision::Rejected(RejectReason::MissingToken)
            );
        }
    }

    #[test]
    fn invalid_token_is_rejected() {
        let gate = gate();
        assert_eq!(
            gate.classify(&Method::GET, "/users/1", &bearer("not.a.token")),
            GateDecision::Rejected(RejectReason::InvalidToken)
        );
    }

    #[test]
    fn valid_token_authenticates_subject() {
        let gate = gate();
        let Ok(token) = gate.tokens().issue("user-42") else {
            panic!("issue failed");
        };
        assert_eq!(
            gate.classify(&Method::GET, "/users/user-42", &bearer(&token)),
            GateDecision::Authenticated(Principal::new("user-42"))
        );
    }

    #[test]
    fn empty_allowlist_protects_everything() {
        let Ok(tokens) = TokenService::new("gate-test-secret-0123456789abcdef") else {
            panic!("valid secret");
        };
        let gate = AuthGate::new(Arc::new(tokens), PublicAllowlist::new());
        assert_eq!(
            gate.classify(&Method::POST, "/users", &HeaderMap::new()),
            GateDecision::Rejected(RejectReason::MissingToken)
        );
    }
}
