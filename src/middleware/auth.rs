// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API key authentication middleware.
//!
//! Clients send `Authorization: Bearer <key>`; the key is hashed with
//! SHA-256 and compared in constant time against the hash loaded at startup.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Middleware that requires a valid API key.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let api_key = match auth_header {
        Some(h) if h.starts_with("Bearer ") => &h[7..],
        _ => return Err(StatusCode::UNAUTHORIZED),
    };

    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    let presented = hasher.finalize();

    let matches: bool = presented
        .as_slice()
        .ct_eq(&state.config.api_key_hash)
        .into();
    if !matches {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use crate::config::hash_api_key;
    use subtle::ConstantTimeEq;

    #[test]
    fn test_hash_comparison() {
        let stored = hash_api_key("correct-key");

        let good = hash_api_key("correct-key");
        let bad = hash_api_key("wrong-key");

        assert!(bool::from(good.as_slice().ct_eq(&stored)));
        assert!(!bool::from(bad.as_slice().ct_eq(&stored)));
    }
}
