use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::auth::hash_token;
use crate::auth::jwt::SessionClaims;
use crate::error::KartelaError;
use crate::models::room_session;

/// Persist the server-side record of a freshly signed session token.
pub async fn create_session<C: ConnectionTrait>(
    db: &C,
    claims: &SessionClaims,
    token: &str,
    ip_address: Option<String>,
    user_agent: Option<String>,
) -> Result<room_session::Model, KartelaError> {
    let model = room_session::ActiveModel {
        user_id: Set(claims.user_id()?),
        room_id: Set(claims.room_id),
        token_hash: Set(hash_token(token)),
        expires_at: Set(claims.expires_at().naive_utc()),
        revoked: Set(false),
        ip_address: Set(ip_address),
        user_agent: Set(user_agent),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

/// Check that a token's session row exists, is not revoked and not expired.
pub async fn validate_session<C: ConnectionTrait>(
    db: &C,
    token: &str,
) -> Result<room_session::Model, KartelaError> {
    let token_hash = hash_token(token);
    let now = Utc::now().naive_utc();

    let session_model = room_session::Entity::find()
        .filter(room_session::Column::TokenHash.eq(token_hash.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| KartelaError::SessionRequired("Session not found".to_string()))?;

    if session_model.revoked {
        return Err(KartelaError::SessionRequired(
            "Session has been revoked".to_string(),
        ));
    }

    if session_model.expires_at <= now {
        return Err(KartelaError::SessionRequired(
            "Session has expired".to_string(),
        ));
    }

    Ok(session_model)
}

/// Revoke a specific session (logout).
pub async fn revoke_session<C: ConnectionTrait>(db: &C, token: &str) -> Result<(), KartelaError> {
    let token_hash = hash_token(token);

    room_session::Entity::update_many()
        .col_expr(room_session::Column::Revoked, Expr::value(true))
        .filter(room_session::Column::TokenHash.eq(token_hash))
        .exec(db)
        .await?;

    Ok(())
}

/// Revoke every open session of a user (deactivation, permission change).
pub async fn revoke_user_sessions<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    room_id: Option<i32>,
) -> Result<u64, KartelaError> {
    let mut query = room_session::Entity::update_many()
        .col_expr(room_session::Column::Revoked, Expr::value(true))
        .filter(room_session::Column::UserId.eq(user_id))
        .filter(room_session::Column::Revoked.eq(false));
    if let Some(room_id) = room_id {
        query = query.filter(room_session::Column::RoomId.eq(room_id));
    }

    Ok(query.exec(db).await?.rows_affected)
}

/// Delete session rows that expired before now.
pub async fn purge_expired<C: ConnectionTrait>(db: &C) -> Result<u64, KartelaError> {
    let now = Utc::now().naive_utc();
    let res = room_session::Entity::delete_many()
        .filter(room_session::Column::ExpiresAt.lt(now))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
