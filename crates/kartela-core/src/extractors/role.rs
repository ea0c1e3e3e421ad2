use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::KartelaError;
use crate::extractors::RoomSession;

/// A room session whose user carries the admin flag.
///
/// ```rust,ignore
/// async fn create_user(AdminSession(session): AdminSession) -> impl IntoResponse {
///     // only admins get here
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminSession(pub RoomSession);

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = KartelaError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = RoomSession::from_request_parts(parts, state).await?;
        if !session.is_admin {
            return Err(KartelaError::Forbidden("Admin access required".to_string()));
        }
        Ok(AdminSession(session))
    }
}
