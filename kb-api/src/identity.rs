//! Submitter identity derivation and masking
//!
//! Ratings are keyed by a best-effort string identity derived from the
//! request's network origin: the first entry of the forwarded-for chain,
//! else the peer socket address, else a loopback sentinel. This is a
//! pseudo-user-key for deduplication, not a verified account.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::async_trait;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Identity used when no network-origin signal is present
pub const FALLBACK_IDENTITY: &str = "127.0.0.1";

/// Mask token appended to the preserved identity prefix
const MASK_SUFFIX: &str = ".*.*.*";

/// Network-derived submitter identity
///
/// Extractor, so handlers take it as an argument. Infallible: there is
/// always a deterministic fallback value.
#[derive(Debug, Clone)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0);
        Ok(ClientIdentity(derive_identity(&parts.headers, peer)))
    }
}

/// Derive the submitter identity from request metadata.
///
/// Proxies append to `X-Forwarded-For`, so the first entry is the
/// original client.
pub fn derive_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| FALLBACK_IDENTITY.to_string())
}

/// Mask an identity for public display: keep the prefix before the first
/// separator, replace the remainder with the mask token
/// (`"203.0.113.9"` -> `"203.*.*.*"`).
pub fn mask_identity(identity: &str) -> String {
    let prefix = identity
        .split(|c| c == '.' || c == ':')
        .next()
        .unwrap_or_default();
    format!("{}{}", prefix, MASK_SUFFIX)
}
