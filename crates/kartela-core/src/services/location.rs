use std::collections::HashMap;

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

use crate::error::KartelaError;
use crate::models::{cabinet, cell, shelf, swatch};

/// Number of non-deleted swatches stored in any of `cell_ids`.
pub async fn count_in_cells<C: ConnectionTrait>(
    db: &C,
    cell_ids: &[i32],
) -> Result<u64, KartelaError> {
    if cell_ids.is_empty() {
        return Ok(0);
    }
    Ok(swatch::Entity::find()
        .filter(swatch::Column::CellId.is_in(cell_ids.iter().copied()))
        .filter(swatch::Column::IsDeleted.eq(false))
        .count(db)
        .await?)
}

pub async fn cell_occupancy<C: ConnectionTrait>(db: &C, cell_id: i32) -> Result<u64, KartelaError> {
    count_in_cells(db, &[cell_id]).await
}

pub async fn shelf_cell_ids<C: ConnectionTrait>(
    db: &C,
    shelf_id: i32,
) -> Result<Vec<i32>, KartelaError> {
    Ok(cell::Entity::find()
        .select_only()
        .column(cell::Column::Id)
        .filter(cell::Column::ShelfId.eq(shelf_id))
        .into_tuple::<i32>()
        .all(db)
        .await?)
}

pub async fn shelf_occupancy<C: ConnectionTrait>(
    db: &C,
    shelf_id: i32,
) -> Result<u64, KartelaError> {
    let cell_ids = shelf_cell_ids(db, shelf_id).await?;
    count_in_cells(db, &cell_ids).await
}

/// Every cell located in a room (room → cabinets → shelves → cells).
pub async fn room_cell_ids<C: ConnectionTrait>(
    db: &C,
    room_id: i32,
) -> Result<Vec<i32>, KartelaError> {
    let cabinet_ids: Vec<i32> = cabinet::Entity::find()
        .select_only()
        .column(cabinet::Column::Id)
        .filter(cabinet::Column::RoomId.eq(room_id))
        .into_tuple()
        .all(db)
        .await?;
    if cabinet_ids.is_empty() {
        return Ok(Vec::new());
    }

    let shelf_ids: Vec<i32> = shelf::Entity::find()
        .select_only()
        .column(shelf::Column::Id)
        .filter(shelf::Column::CabinetId.is_in(cabinet_ids))
        .into_tuple()
        .all(db)
        .await?;
    if shelf_ids.is_empty() {
        return Ok(Vec::new());
    }

    Ok(cell::Entity::find()
        .select_only()
        .column(cell::Column::Id)
        .filter(cell::Column::ShelfId.is_in(shelf_ids))
        .into_tuple()
        .all(db)
        .await?)
}

/// Occupancy of every cell holding at least one swatch.
pub async fn occupancy_by_cell<C: ConnectionTrait>(
    db: &C,
) -> Result<HashMap<i32, u64>, KartelaError> {
    let rows: Vec<(Option<i32>, i64)> = swatch::Entity::find()
        .select_only()
        .column(swatch::Column::CellId)
        .column_as(Expr::col(swatch::Column::Id).count(), "occupied")
        .filter(swatch::Column::CellId.is_not_null())
        .filter(swatch::Column::IsDeleted.eq(false))
        .group_by(swatch::Column::CellId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(cell_id, n)| cell_id.map(|id| (id, n.max(0) as u64)))
        .collect())
}

/// Reject placing one more swatch into `cell` when the cell or its shelf
/// is already at capacity. `moving` is the swatch being placed; it is not
/// counted against the capacity it already occupies.
pub async fn ensure_room_for_one<C: ConnectionTrait>(
    db: &C,
    cell: &cell::Model,
    moving: Option<i32>,
) -> Result<(), KartelaError> {
    let occupied = count_excluding(db, &[cell.id], moving).await?;
    if occupied >= cell.capacity.max(0) as u64 {
        return Err(KartelaError::Conflict(format!(
            "Cell {} is full ({}/{})",
            cell.code, occupied, cell.capacity
        )));
    }

    let shelf = shelf::Entity::find_by_id(cell.shelf_id)
        .one(db)
        .await?
        .ok_or_else(|| KartelaError::NotFound(format!("Shelf {} not found", cell.shelf_id)))?;
    let cell_ids = shelf_cell_ids(db, shelf.id).await?;
    let shelf_occupied = count_excluding(db, &cell_ids, moving).await?;
    if shelf_occupied >= shelf.capacity.max(0) as u64 {
        return Err(KartelaError::Conflict(format!(
            "Shelf {} is full ({}/{})",
            shelf.code, shelf_occupied, shelf.capacity
        )));
    }

    Ok(())
}

async fn count_excluding<C: ConnectionTrait>(
    db: &C,
    cell_ids: &[i32],
    excluded: Option<i32>,
) -> Result<u64, KartelaError> {
    let Some(excluded) = excluded else {
        return count_in_cells(db, cell_ids).await;
    };
    if cell_ids.is_empty() {
        return Ok(0);
    }
    Ok(swatch::Entity::find()
        .filter(swatch::Column::CellId.is_in(cell_ids.iter().copied()))
        .filter(swatch::Column::IsDeleted.eq(false))
        .filter(swatch::Column::Id.ne(excluded))
        .count(db)
        .await?)
}

pub async fn find_cell<C: ConnectionTrait>(db: &C, cell_id: i32) -> Result<cell::Model, KartelaError> {
    cell::Entity::find_by_id(cell_id)
        .one(db)
        .await?
        .ok_or_else(|| KartelaError::NotFound(format!("Cell with id {} not found", cell_id)))
}
