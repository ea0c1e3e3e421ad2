use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::KartelaError;
use crate::models::user::Role;

/// The authenticated room session of the current request.
///
/// Populated by [`crate::auth::room_guard`]; handlers behind the guard take
/// it as an extractor:
/// ```rust,ignore
/// async fn dashboard(session: RoomSession) -> impl IntoResponse {
///     // session.room_id, session.user_id
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RoomSession {
    pub session_id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub role: Role,
    pub is_admin: bool,
    pub room_id: i32,
    pub room_code: String,
    pub room_name: String,
    pub expires_at: DateTime<Utc>,
}

impl RoomSession {
    /// Fail unless the session user holds at least `required` (admins pass).
    pub fn require_role(&self, required: Role) -> Result<(), KartelaError> {
        if self.is_admin || self.role.has_permission(&required) {
            Ok(())
        } else {
            Err(KartelaError::Forbidden(format!(
                "{} access required",
                required.as_str()
            )))
        }
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            user_id: self.user_id,
            room_id: self.room_id,
            room_code: self.room_code.clone(),
            user_name: self.user_name.clone(),
            room_name: self.room_name.clone(),
            expires_at: self.expires_at.to_rfc3339(),
        }
    }
}

impl<S> FromRequestParts<S> for RoomSession
where
    S: Send + Sync,
{
    type Rejection = KartelaError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RoomSession>()
            .cloned()
            .ok_or_else(|| KartelaError::SessionRequired("Missing room session".to_string()))
    }
}

/// Session object handed to clients after a successful room scan.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user_id: i32,
    pub room_id: i32,
    pub room_code: String,
    pub user_name: String,
    pub room_name: String,
    /// ISO-8601 expiry timestamp
    pub expires_at: String,
}
