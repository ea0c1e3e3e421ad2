use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TIMESTAMP_FORMAT;

/// Append-only audit row written for every swatch state change
/// (`hareket_loglari`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hareket_loglari")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub swatch_id: i32,

    /// `CREATE`, `TRANSFER`, `RESET`, `SLOT_FILL`, `ASSIGN`, `STATUS_CHANGE`, `DELETE`
    pub action: String,

    pub from_status: Option<String>,
    pub to_status: Option<String>,
    pub from_cell_id: Option<i32>,
    pub to_cell_id: Option<i32>,

    pub reason: Option<String>,

    pub user_id: Option<i32>,
    pub room_id: Option<i32>,

    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MovementResponse {
    pub id: i32,
    pub swatch_id: i32,
    pub action: String,
    pub from_status: Option<String>,
    pub to_status: Option<String>,
    pub from_cell_id: Option<i32>,
    pub to_cell_id: Option<i32>,
    pub reason: Option<String>,
    pub user_id: Option<i32>,
    pub room_id: Option<i32>,
    pub created_at: String,
}

impl From<Model> for MovementResponse {
    fn from(m: Model) -> Self {
        MovementResponse {
            id: m.id,
            swatch_id: m.swatch_id,
            action: m.action,
            from_status: m.from_status,
            to_status: m.to_status,
            from_cell_id: m.from_cell_id,
            to_cell_id: m.to_cell_id,
            reason: m.reason,
            user_id: m.user_id,
            room_id: m.room_id,
            created_at: m.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
