use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

use crate::error::KartelaError;
use crate::extractors::RoomSession;
use crate::models::swatch::SwatchStatus;
use crate::models::{movement_log, system_log};

/// Who performed an audited change.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actor {
    pub user_id: Option<i32>,
    pub room_id: Option<i32>,
}

impl From<&RoomSession> for Actor {
    fn from(session: &RoomSession) -> Self {
        Actor {
            user_id: Some(session.user_id),
            room_id: Some(session.room_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementAction {
    Create,
    Update,
    Transfer,
    Reset,
    SlotFill,
    Assign,
    StatusChange,
    Delete,
}

impl MovementAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementAction::Create => "CREATE",
            MovementAction::Update => "UPDATE",
            MovementAction::Transfer => "TRANSFER",
            MovementAction::Reset => "RESET",
            MovementAction::SlotFill => "SLOT_FILL",
            MovementAction::Assign => "ASSIGN",
            MovementAction::StatusChange => "STATUS_CHANGE",
            MovementAction::Delete => "DELETE",
        }
    }
}

/// A movement-log row under construction.
#[derive(Debug, Clone)]
pub struct Movement {
    swatch_id: i32,
    action: MovementAction,
    from_status: Option<SwatchStatus>,
    to_status: Option<SwatchStatus>,
    from_cell_id: Option<i32>,
    to_cell_id: Option<i32>,
    reason: Option<String>,
}

impl Movement {
    pub fn new(swatch_id: i32, action: MovementAction) -> Self {
        Movement {
            swatch_id,
            action,
            from_status: None,
            to_status: None,
            from_cell_id: None,
            to_cell_id: None,
            reason: None,
        }
    }

    pub fn status(mut self, from: SwatchStatus, to: SwatchStatus) -> Self {
        self.from_status = Some(from);
        self.to_status = Some(to);
        self
    }

    pub fn cells(mut self, from: Option<i32>, to: Option<i32>) -> Self {
        self.from_cell_id = from;
        self.to_cell_id = to;
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn reason_opt(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }

    /// Append the row.
    pub async fn record<C: ConnectionTrait>(
        self,
        db: &C,
        actor: Actor,
    ) -> Result<movement_log::Model, KartelaError> {
        let row = movement_log::ActiveModel {
            swatch_id: Set(self.swatch_id),
            action: Set(self.action.as_str().to_string()),
            from_status: Set(self.from_status.map(|s| s.as_str().to_string())),
            to_status: Set(self.to_status.map(|s| s.as_str().to_string())),
            from_cell_id: Set(self.from_cell_id),
            to_cell_id: Set(self.to_cell_id),
            reason: Set(self.reason),
            user_id: Set(actor.user_id),
            room_id: Set(actor.room_id),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        Ok(row.insert(db).await?)
    }
}

/// Append a system-log row.
pub async fn record_system<C: ConnectionTrait>(
    db: &C,
    user_id: Option<i32>,
    action: &str,
    entity: &str,
    entity_id: Option<i32>,
    detail: Option<String>,
) -> Result<system_log::Model, KartelaError> {
    let row = system_log::ActiveModel {
        user_id: Set(user_id),
        action: Set(action.to_string()),
        entity: Set(entity.to_string()),
        entity_id: Set(entity_id),
        detail: Set(detail),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}
