use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Shelf inside a cabinet (`raflar`). `capacity` bounds the swatches held
/// by all of its cells together.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "raflar")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub cabinet_id: i32,
    pub code: String,
    pub capacity: i32,

    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShelfResponse {
    pub id: i32,
    pub cabinet_id: i32,
    pub code: String,
    pub capacity: i32,
    pub occupied: u64,
}

impl ShelfResponse {
    pub fn new(shelf: Model, occupied: u64) -> Self {
        ShelfResponse {
            id: shelf.id,
            cabinet_id: shelf.cabinet_id,
            code: shelf.code,
            capacity: shelf.capacity,
            occupied,
        }
    }
}
