use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TIMESTAMP_FORMAT;

/// Customer that swatches are assigned to (`musteriler`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "musteriler")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub code: String,

    pub name: String,
    pub is_active: bool,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Customer with swatch counts computed at read time.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    /// Swatches currently assigned to the customer
    pub swatch_count: u64,
    /// Assigned swatches whose slots are all used
    pub full_swatch_count: u64,
    pub created_at: String,
}

impl CustomerResponse {
    pub fn new(c: Model, swatch_count: u64, full_swatch_count: u64) -> Self {
        CustomerResponse {
            id: c.id,
            code: c.code,
            name: c.name,
            is_active: c.is_active,
            swatch_count,
            full_swatch_count,
            created_at: c.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
