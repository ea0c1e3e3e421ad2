use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TIMESTAMP_FORMAT;

/// Grants one user access to one room (`kullanici_yetkileri`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kullanici_yetkileri")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    pub room_id: i32,

    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PermissionResponse {
    pub id: i32,
    pub user_id: i32,
    pub room_id: i32,
    pub created_at: String,
}

impl From<Model> for PermissionResponse {
    fn from(p: Model) -> Self {
        PermissionResponse {
            id: p.id,
            user_id: p.user_id,
            room_id: p.room_id,
            created_at: p.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
