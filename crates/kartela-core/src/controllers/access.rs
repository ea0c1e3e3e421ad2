use axum::http::HeaderMap;
use axum::{Router, extract::State, routing::{get, post}};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::middleware::{authenticate, session_token};
use crate::auth::{SESSION_COOKIE, session};
use crate::error::KartelaError;
use crate::extractors::{ClientAddr, Json, SessionInfo};
use crate::models::user::{self, Role};
use crate::response::ApiResponse;
use crate::services::access;

use super::AppState;

// ── Request / Response types ──

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BadgeScanRequest {
    /// Personnel code or badge QR payload
    #[validate(length(min = 1, max = 128, message = "badge code is required"))]
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BadgeUser {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub role: Role,
}

impl From<user::Model> for BadgeUser {
    fn from(u: user::Model) -> Self {
        BadgeUser {
            id: u.id,
            role: u.staff_role(),
            code: u.code,
            name: u.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BadgeScanResponse {
    pub user: BadgeUser,
    /// Short-lived ticket to present with the room scan
    pub badge_ticket: String,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RoomScanRequest {
    #[validate(length(min = 1, message = "badge ticket is required"))]
    pub badge_ticket: String,
    /// Room QR payload or room code
    #[validate(length(min = 1, max = 128, message = "room code is required"))]
    pub room_code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomAccessResponse {
    pub session: SessionInfo,
    /// Signed session token, also set as the `room_session` cookie
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ── Routes ──

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/badge", post(scan_badge))
        .route("/room", post(scan_room))
        .route("/session", get(current_session))
        .route("/logout", post(logout))
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

// ── Handlers ──

/// Scan a personnel badge (step one of two).
#[utoipa::path(
    post,
    path = "/api/access/badge",
    request_body = BadgeScanRequest,
    responses(
        (status = 200, description = "Badge accepted", body = ApiResponse<BadgeScanResponse>),
        (status = 401, description = "Unknown badge"),
        (status = 403, description = "User is not active"),
        (status = 429, description = "Too many attempts")
    ),
    tag = "access"
)]
pub async fn scan_badge(
    State(state): State<AppState>,
    client: ClientAddr,
    Json(payload): Json<BadgeScanRequest>,
) -> Result<ApiResponse<BadgeScanResponse>, KartelaError> {
    payload.validate()?;

    if state.config.access.enable_rate_limit {
        let key = client.ip.as_deref().unwrap_or(payload.code.trim());
        if let Err(retry_after) = state.badge_limiter.check(key) {
            tracing::warn!(key, retry_after, "badge scan rate limited");
            return Err(KartelaError::RateLimited(retry_after));
        }
    }

    let (user, badge_ticket) =
        access::issue_badge_ticket(&state.db, &state.config, &payload.code).await?;

    Ok(ApiResponse::success(BadgeScanResponse {
        user: user.into(),
        badge_ticket,
        expires_in: state.config.access.badge_ticket_ttl_secs,
    }))
}

/// Scan a room QR code (step two) and open a room session.
#[utoipa::path(
    post,
    path = "/api/access/room",
    request_body = RoomScanRequest,
    responses(
        (status = 200, description = "Access granted; sets the room_session cookie", body = ApiResponse<RoomAccessResponse>),
        (status = 401, description = "Badge ticket invalid or expired"),
        (status = 403, description = "Room inactive or no permission"),
        (status = 404, description = "Unknown room")
    ),
    tag = "access"
)]
pub async fn scan_room(
    State(state): State<AppState>,
    client: ClientAddr,
    jar: CookieJar,
    Json(payload): Json<RoomScanRequest>,
) -> Result<(CookieJar, ApiResponse<RoomAccessResponse>), KartelaError> {
    payload.validate()?;

    let granted = access::scan_room(
        &state.db,
        &state.config,
        &payload.badge_ticket,
        &payload.room_code,
        client.ip,
        client.user_agent,
    )
    .await?;

    let session = SessionInfo {
        user_id: granted.user.id,
        room_id: granted.room.id,
        room_code: granted.room.code.clone(),
        user_name: granted.user.name.clone(),
        room_name: granted.room.name.clone(),
        expires_at: granted.claims.expires_at().to_rfc3339(),
    };
    let jar = jar.add(session_cookie(
        granted.token.clone(),
        state.config.access.secure_cookies,
    ));

    Ok((
        jar,
        ApiResponse::success(RoomAccessResponse {
            session,
            token: granted.token,
        }),
    ))
}

/// Return the caller's current room session.
#[utoipa::path(
    get,
    path = "/api/access/session",
    responses(
        (status = 200, description = "Active session", body = ApiResponse<SessionInfo>),
        (status = 401, description = "No valid session")
    ),
    tag = "access",
    security(("room_session" = []), ("bearer_auth" = []))
)]
pub async fn current_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiResponse<SessionInfo>, KartelaError> {
    let token = session_token(&headers)
        .ok_or_else(|| KartelaError::SessionRequired("Missing room session".to_string()))?;
    let room_session = authenticate(&state, &token).await?;
    Ok(ApiResponse::success(room_session.info()))
}

/// Revoke the current session and clear its cookie.
#[utoipa::path(
    post,
    path = "/api/access/logout",
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<MessageResponse>)
    ),
    tag = "access"
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, ApiResponse<MessageResponse>), KartelaError> {
    if let Some(token) = session_token(&headers) {
        session::revoke_session(&state.db, &token).await?;
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));

    Ok((
        jar,
        ApiResponse::success(MessageResponse {
            message: "Logged out".to_string(),
        }),
    ))
}
