use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TIMESTAMP_FORMAT;

/// Cabinet standing in a room (`dolaplar`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dolaplar")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub room_id: i32,
    pub code: String,
    pub name: String,

    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CabinetResponse {
    pub id: i32,
    pub room_id: i32,
    pub code: String,
    pub name: String,
    pub created_at: String,
}

impl From<Model> for CabinetResponse {
    fn from(c: Model) -> Self {
        CabinetResponse {
            id: c.id,
            room_id: c.room_id,
            code: c.code,
            name: c.name,
            created_at: c.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
