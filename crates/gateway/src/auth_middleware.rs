use {
    axum::{
        extract::{Request, State},
        http::{HeaderMap, StatusCode, header::AUTHORIZATION},
        middleware::Next,
        response::{IntoResponse, Json, Response},
    },
    sha2::{Digest, Sha256},
    tracing::warn,
};

use crate::server::AppState;

/// Header carrying the API key. `Authorization: Bearer <key>` is accepted too.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The configured master key, kept only as its SHA-256 digest.
#[derive(Clone)]
pub struct MasterKey {
    digest: Vec<u8>,
}

impl MasterKey {
    pub fn new(key: &str) -> Self {
        Self {
            digest: sha256(key),
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        sha256(candidate) == self.digest
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

fn sha256(input: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hasher.finalize().to_vec()
}

/// Pull the presented key out of `X-API-Key` or a bearer token.
pub fn presented_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(key) = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(key);
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Middleware that protects the API behind the master key.
///
/// With no master key configured every request passes (development mode).
pub async fn require_master_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(ref master_key) = state.master_key else {
        return next.run(request).await;
    };

    if let Some(key) = presented_key(request.headers())
        && master_key.matches(key)
    {
        return next.run(request).await;
    }

    warn!(
        method = %request.method(),
        path = %request.uri().path(),
        "rejected request without a valid API key"
    );
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "detail": "invalid or missing API key" })),
    )
        .into_response()
}
