use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Storage cell on a shelf (`hucreler`); the smallest location a swatch
/// can be assigned to.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hucreler")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub shelf_id: i32,
    pub code: String,
    pub capacity: i32,

    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CellResponse {
    pub id: i32,
    pub shelf_id: i32,
    pub code: String,
    pub capacity: i32,
    pub occupied: u64,
    pub is_full: bool,
}

impl CellResponse {
    pub fn new(cell: Model, occupied: u64) -> Self {
        CellResponse {
            is_full: occupied >= cell.capacity.max(0) as u64,
            id: cell.id,
            shelf_id: cell.shelf_id,
            code: cell.code,
            capacity: cell.capacity,
            occupied,
        }
    }
}
