use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TIMESTAMP_FORMAT;

/// Append-only audit row for access grants and admin actions
/// (`sistem_loglari`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sistem_loglari")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: Option<i32>,
    pub action: String,
    pub entity: String,
    pub entity_id: Option<i32>,

    #[sea_orm(column_type = "Text", nullable)]
    pub detail: Option<String>,

    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SystemLogResponse {
    pub id: i32,
    pub user_id: Option<i32>,
    pub action: String,
    pub entity: String,
    pub entity_id: Option<i32>,
    pub detail: Option<String>,
    pub created_at: String,
}

impl From<Model> for SystemLogResponse {
    fn from(m: Model) -> Self {
        SystemLogResponse {
            id: m.id,
            user_id: m.user_id,
            action: m.action,
            entity: m.entity,
            entity_id: m.entity_id,
            detail: m.detail,
            created_at: m.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
