use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

use crate::auth::{forwarded_ip, user_agent};
use crate::controllers::AppState;

/// Address and user agent of the caller.
///
/// The address is the socket peer unless `TRUST_PROXY_HEADERS` is set, in
/// which case the proxy's `X-Forwarded-For` / `X-Real-IP` wins. Requires the
/// server to run with `into_make_service_with_connect_info::<SocketAddr>()`.
#[derive(Debug, Clone, Default)]
pub struct ClientAddr {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl FromRequestParts<AppState> for ClientAddr {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let forwarded = if state.config.access.trust_proxy_headers {
            forwarded_ip(&parts.headers)
        } else {
            None
        };
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(ClientAddr {
            ip: forwarded.or(peer),
            user_agent: user_agent(&parts.headers),
        })
    }
}
