pub mod jwt;
pub mod middleware;
pub mod rate_limit;
pub mod session;

use sha2::{Digest, Sha256};

pub use jwt::{BadgeClaims, SessionClaims};
pub use middleware::{SESSION_COOKIE, room_guard};
pub use rate_limit::RateLimiter;

/// SHA-256 hash a token for safe database storage.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// First address reported by the proxy headers.
pub fn forwarded_ip(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
}

pub fn user_agent(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    #[test]
    fn test_hash_token_is_stable_hex() {
        let a = hash_token("abc");
        assert_eq!(a, hash_token("abc"));
        assert_eq!(a.len(), 64);
        assert_ne!(a, hash_token("abd"));
    }

    #[test]
    fn test_forwarded_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.7, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));
        headers.insert("user-agent", HeaderValue::from_static("scanner/1.0"));

        assert_eq!(forwarded_ip(&headers).as_deref(), Some("10.0.0.7"));
        assert_eq!(user_agent(&headers).as_deref(), Some("scanner/1.0"));

        headers.remove("x-forwarded-for");
        assert_eq!(forwarded_ip(&headers).as_deref(), Some("10.0.0.9"));
    }

    #[test]
    fn test_forwarded_ip_empty_headers() {
        assert!(forwarded_ip(&HeaderMap::new()).is_none());
        assert!(user_agent(&HeaderMap::new()).is_none());
    }
}
