use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TIMESTAMP_FORMAT;

/// Access-controlled room (`odalar`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "odalar")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Room code used in URLs (e.g. `ROOM-0001`)
    #[sea_orm(unique)]
    pub code: String,

    pub name: String,

    /// Payload of the QR code posted at the room door
    #[sea_orm(unique)]
    pub qr_code: String,

    pub is_active: bool,

    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomResponse {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub qr_code: String,
    pub is_active: bool,
    pub created_at: String,
}

impl From<Model> for RoomResponse {
    fn from(room: Model) -> Self {
        RoomResponse {
            id: room.id,
            code: room.code,
            name: room.name,
            qr_code: room.qr_code,
            is_active: room.is_active,
            created_at: room.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
