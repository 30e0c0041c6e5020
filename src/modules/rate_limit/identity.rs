use axum::http::{header, HeaderMap};

use crate::shared::constants::CLIENT_UA_PREFIX_LEN;

/// Derive a stable-ish client identifier from request metadata.
///
/// Best-effort source address from proxy headers, falling back to a loopback
/// placeholder, combined with a truncated user-agent fingerprint. Known
/// heuristic limitation: distinct users behind the same proxy with similar
/// user agents can collide.
pub fn client_identifier(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty());

    // Cloudflare
    let cf_connecting_ip = headers
        .get("cf-connecting-ip")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty());

    let ip = forwarded
        .or(real_ip)
        .or(cf_connecting_ip)
        .unwrap_or("localhost");

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let ua_prefix: String = user_agent.chars().take(CLIENT_UA_PREFIX_LEN).collect();

    format!("{}-{}", ip, ua_prefix)
}
