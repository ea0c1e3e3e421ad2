use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Server-side record of an issued room session (`oda_oturumlari`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "oda_oturumlari")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    pub room_id: i32,

    /// SHA-256 of the signed session token
    #[sea_orm(unique)]
    pub token_hash: String,

    pub expires_at: NaiveDateTime,

    #[sea_orm(default_value = false)]
    pub revoked: bool,

    pub ip_address: Option<String>,
    pub user_agent: Option<String>,

    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
