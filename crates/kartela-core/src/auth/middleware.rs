//! Route guard for room-scoped endpoints.
//!
//! Every route under `/api/room/{room_code}/` is wrapped with
//! [`room_guard`]:
//!
//! ```rust,ignore
//! Router::new()
//!     .route("/api/room/{room_code}/swatches", get(list_swatches))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), room_guard))
//! ```

use std::collections::HashMap;

use axum::extract::{Path, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use sea_orm::EntityTrait;

use crate::auth::{jwt, session};
use crate::controllers::AppState;
use crate::error::KartelaError;
use crate::extractors::RoomSession;
use crate::models::{room, user};

/// Name of the cookie carrying the signed room session token.
pub const SESSION_COOKIE: &str = "room_session";

/// Read the session token from the `room_session` cookie, falling back to
/// an `Authorization: Bearer` header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve a session token into the caller's room session.
///
/// Checks the signature and expiry, the server-side session row, and that
/// both the user and the room are still active.
pub async fn authenticate(state: &AppState, token: &str) -> Result<RoomSession, KartelaError> {
    let claims = jwt::validate_session_token(token, &state.config.jwt_secret)?;
    let session_row = session::validate_session(&state.db, token).await?;
    let user_id = claims.user_id()?;

    let user = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| KartelaError::SessionRequired("User not found".to_string()))?;
    if !user.is_active {
        return Err(KartelaError::SessionRequired(
            "User is deactivated".to_string(),
        ));
    }

    let room = room::Entity::find_by_id(claims.room_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| KartelaError::SessionRequired("Room not found".to_string()))?;
    if !room.is_active {
        return Err(KartelaError::SessionRequired(
            "Room is deactivated".to_string(),
        ));
    }

    Ok(RoomSession {
        session_id: session_row.id,
        user_id: user.id,
        user_name: user.name.clone(),
        role: user.staff_role(),
        is_admin: user.is_admin,
        room_id: room.id,
        room_code: room.code,
        room_name: room.name,
        expires_at: claims.expires_at(),
    })
}

/// Middleware rejecting requests without a valid session for the room in
/// the path. The resolved [`RoomSession`] is stored in request extensions.
pub async fn room_guard(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    mut req: Request,
    next: Next,
) -> Result<Response, KartelaError> {
    let room_code = params
        .get("room_code")
        .ok_or_else(|| KartelaError::Internal("room guard mounted without {room_code}".to_string()))?;

    let token = session_token(req.headers())
        .ok_or_else(|| KartelaError::SessionRequired("Missing room session".to_string()))?;

    let room_session = authenticate(&state, &token).await?;

    if !room_session.room_code.eq_ignore_ascii_case(room_code) {
        tracing::warn!(
            user_id = room_session.user_id,
            session_room = %room_session.room_code,
            requested_room = %room_code,
            "room session used for another room"
        );
        return Err(KartelaError::SessionRequired(
            "Session belongs to another room".to_string(),
        ));
    }

    req.extensions_mut().insert(room_session);
    Ok(next.run(req).await)
}
