//! Badge → room access flow.

use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    TransactionTrait,
};

use crate::auth::jwt::{self, SessionClaims};
use crate::auth::session;
use crate::config::Config;
use crate::error::KartelaError;
use crate::models::{permission, room, user};
use crate::services::audit;

/// Outcome of a successful room scan.
#[derive(Debug, Clone)]
pub struct GrantedSession {
    pub token: String,
    pub claims: SessionClaims,
    pub user: user::Model,
    pub room: room::Model,
}

fn normalize_scan(input: &str, what: &str) -> Result<String, KartelaError> {
    let code = input.trim();
    if code.is_empty() {
        return Err(KartelaError::Validation(format!("{} code is required", what)));
    }
    Ok(code.to_string())
}

/// Step one: resolve a scanned badge into an active user.
pub async fn scan_badge(db: &DatabaseConnection, input: &str) -> Result<user::Model, KartelaError> {
    let code = normalize_scan(input, "Badge")?;

    let found = user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Code.eq(code.as_str()))
                .add(user::Column::QrCode.eq(code.as_str())),
        )
        .one(db)
        .await?;

    let Some(user) = found else {
        tracing::warn!(badge = %code, "badge scan denied: unknown badge");
        return Err(KartelaError::Unauthorized("Unknown badge".to_string()));
    };

    if !user.is_active {
        tracing::warn!(user_id = user.id, "badge scan denied: user inactive");
        return Err(KartelaError::Forbidden("User is not active".to_string()));
    }

    tracing::info!(user_id = user.id, "badge accepted");
    Ok(user)
}

/// Step one, plus the signed ticket the room step requires.
pub async fn issue_badge_ticket(
    db: &DatabaseConnection,
    config: &Config,
    input: &str,
) -> Result<(user::Model, String), KartelaError> {
    let user = scan_badge(db, input).await?;
    let ticket =
        jwt::create_badge_ticket(user.id, &config.jwt_secret, config.access.badge_ticket_ttl_secs)?;
    Ok((user, ticket))
}

async fn deny(
    db: &DatabaseConnection,
    user_id: i32,
    room_id: Option<i32>,
    reason: &str,
    err: KartelaError,
) -> KartelaError {
    tracing::warn!(user_id, room_id, reason, "room access denied");
    if let Err(log_err) = audit::record_system(
        db,
        Some(user_id),
        "ACCESS_DENIED",
        "room",
        room_id,
        Some(reason.to_string()),
    )
    .await
    {
        tracing::error!(error = %log_err, "failed to record access denial");
    }
    err
}

/// Step two: check the room and the permission, then open a session.
///
/// Denials never write a session row.
pub async fn scan_room(
    db: &DatabaseConnection,
    config: &Config,
    badge_ticket: &str,
    room_input: &str,
    ip_address: Option<String>,
    user_agent: Option<String>,
) -> Result<GrantedSession, KartelaError> {
    let user_id = jwt::validate_badge_ticket(badge_ticket, &config.jwt_secret)?;
    let code = normalize_scan(room_input, "Room")?;

    let user = user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| KartelaError::Unauthorized("Unknown badge".to_string()))?;
    if !user.is_active {
        return Err(deny(
            db,
            user.id,
            None,
            "user inactive",
            KartelaError::Forbidden("User is not active".to_string()),
        )
        .await);
    }

    let found = room::Entity::find()
        .filter(
            Condition::any()
                .add(room::Column::QrCode.eq(code.as_str()))
                .add(room::Column::Code.eq(code.as_str())),
        )
        .one(db)
        .await?;
    let Some(room) = found else {
        return Err(deny(
            db,
            user.id,
            None,
            "unknown room",
            KartelaError::NotFound("Unknown room".to_string()),
        )
        .await);
    };

    if !room.is_active {
        return Err(deny(
            db,
            user.id,
            Some(room.id),
            "room inactive",
            KartelaError::Forbidden("Room is not active".to_string()),
        )
        .await);
    }

    let permitted = permission::Entity::find()
        .filter(permission::Column::UserId.eq(user.id))
        .filter(permission::Column::RoomId.eq(room.id))
        .count(db)
        .await?
        > 0;
    if !permitted {
        return Err(deny(
            db,
            user.id,
            Some(room.id),
            "no permission",
            KartelaError::Forbidden(format!("No access to room {}", room.code)),
        )
        .await);
    }

    let claims = SessionClaims::new(
        user.id,
        &user.name,
        room.id,
        &room.code,
        &room.name,
        Utc::now(),
        config.access.session_ttl_hours,
    );
    let token = jwt::encode_claims(&claims, &config.jwt_secret)?;

    let txn = db.begin().await?;
    session::create_session(&txn, &claims, &token, ip_address, user_agent).await?;
    audit::record_system(
        &txn,
        Some(user.id),
        "ACCESS_GRANTED",
        "room",
        Some(room.id),
        None,
    )
    .await?;
    txn.commit().await?;

    tracing::info!(user_id = user.id, room = %room.code, "room access granted");

    Ok(GrantedSession {
        token,
        claims,
        user,
        room,
    })
}
