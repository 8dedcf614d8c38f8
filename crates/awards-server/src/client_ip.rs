//! Client address resolution.
//!
//! The resolved address is both the voter identity and the rate-limit key.
//! It trusts proxy headers, so it is only as strong as the reverse proxy in
//! front of the server.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

/// Longest header value accepted as an address (IPv6 with zone fits).
const MAX_ADDR_LEN: usize = 64;

/// Placeholder when no address can be determined (e.g. in-process tests).
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Best-effort client address of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self(resolve_client_ip(&parts.headers, peer)))
    }
}

/// First `X-Forwarded-For` hop, else `X-Real-IP`, else the TCP peer.
pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    forwarded_for(headers)
        .or_else(|| header_addr(headers, "x-real-ip"))
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = raw.split(',').next()?;
    sanitize_addr(first)
}

fn header_addr(headers: &HeaderMap, name: &str) -> Option<String> {
    sanitize_addr(headers.get(name)?.to_str().ok()?)
}

fn sanitize_addr(raw: &str) -> Option<String> {
    let addr = raw.trim();
    if addr.is_empty() || addr.len() > MAX_ADDR_LEN {
        return None;
    }
    addr.bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b':' | b'-' | b'%'))
        .then(|| addr.to_string())
}
