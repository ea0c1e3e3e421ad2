use axum::extract::{Path, State};
use axum::{Router, routing::{get, post}};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::KartelaError;
use crate::extractors::{Json, Query, RoomSession};
use crate::models::cabinet::{self, CabinetResponse};
use crate::models::cell::{self, CellResponse};
use crate::models::room;
use crate::models::shelf::{self, ShelfResponse};
use crate::models::swatch::{self, SwatchResponse};
use crate::models::user::Role;
use crate::response::ApiResponse;
use crate::services::{audit, location};

use super::AppState;

// ── Request / Response types ──

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CabinetQuery {
    /// Room to list; defaults to the session's room
    pub room_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCabinetRequest {
    /// Defaults to the session's room
    pub room_id: Option<i32>,
    #[validate(length(min = 1, max = 64, message = "code is required"))]
    pub code: String,
    #[validate(length(min = 1, max = 128, message = "name is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateShelfRequest {
    pub cabinet_id: i32,
    #[validate(length(min = 1, max = 64, message = "code is required"))]
    pub code: String,
    #[validate(range(min = 1, message = "capacity must be at least 1"))]
    pub capacity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCellRequest {
    pub shelf_id: i32,
    #[validate(length(min = 1, max = 64, message = "code is required"))]
    pub code: String,
    #[validate(range(min = 1, message = "capacity must be at least 1"))]
    pub capacity: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CellDetail {
    pub cell: CellResponse,
    pub swatches: Vec<SwatchResponse>,
}

// ── Routes ──

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cabinets", get(list_cabinets).post(create_cabinet))
        .route("/cabinets/{id}/shelves", get(list_shelves))
        .route("/shelves", post(create_shelf))
        .route("/shelves/{id}/cells", get(list_cells))
        .route("/cells", post(create_cell))
        .route("/cells/{id}", get(get_cell))
}

// ── Handlers ──

/// Cabinets of a room.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/cabinets",
    params(("room_code" = String, Path, description = "Room of the session"), CabinetQuery),
    responses(
        (status = 200, description = "Cabinets", body = ApiResponse<Vec<CabinetResponse>>)
    ),
    tag = "locations"
)]
pub async fn list_cabinets(
    State(state): State<AppState>,
    session: RoomSession,
    Query(query): Query<CabinetQuery>,
) -> Result<ApiResponse<Vec<CabinetResponse>>, KartelaError> {
    let room_id = query.room_id.unwrap_or(session.room_id);
    let cabinets = cabinet::Entity::find()
        .filter(cabinet::Column::RoomId.eq(room_id))
        .order_by_asc(cabinet::Column::Code)
        .all(&state.db)
        .await?;
    Ok(ApiResponse::success(
        cabinets.into_iter().map(CabinetResponse::from).collect(),
    ))
}

/// Add a cabinet (supervisor or above).
#[utoipa::path(
    post,
    path = "/api/room/{room_code}/cabinets",
    params(("room_code" = String, Path, description = "Room of the session")),
    request_body = CreateCabinetRequest,
    responses(
        (status = 200, description = "Cabinet created", body = ApiResponse<CabinetResponse>),
        (status = 404, description = "Room not found")
    ),
    tag = "locations"
)]
pub async fn create_cabinet(
    State(state): State<AppState>,
    session: RoomSession,
    Json(payload): Json<CreateCabinetRequest>,
) -> Result<ApiResponse<CabinetResponse>, KartelaError> {
    session.require_role(Role::Supervisor)?;
    payload.validate()?;

    let room_id = payload.room_id.unwrap_or(session.room_id);
    room::Entity::find_by_id(room_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| KartelaError::NotFound(format!("Room with id {} not found", room_id)))?;

    let txn = state.db.begin().await?;
    let created = cabinet::ActiveModel {
        room_id: Set(room_id),
        code: Set(payload.code.trim().to_string()),
        name: Set(payload.name.trim().to_string()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    audit::record_system(
        &txn,
        Some(session.user_id),
        "CABINET_CREATED",
        "cabinet",
        Some(created.id),
        Some(created.code.clone()),
    )
    .await?;
    txn.commit().await?;

    Ok(ApiResponse::success(created.into()))
}

/// Shelves of a cabinet with their occupancy.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/cabinets/{id}/shelves",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Cabinet ID")
    ),
    responses(
        (status = 200, description = "Shelves", body = ApiResponse<Vec<ShelfResponse>>),
        (status = 404, description = "Cabinet not found")
    ),
    tag = "locations"
)]
pub async fn list_shelves(
    State(state): State<AppState>,
    Path((_room_code, id)): Path<(String, i32)>,
) -> Result<ApiResponse<Vec<ShelfResponse>>, KartelaError> {
    cabinet::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| KartelaError::NotFound(format!("Cabinet with id {} not found", id)))?;

    let shelves = shelf::Entity::find()
        .filter(shelf::Column::CabinetId.eq(id))
        .order_by_asc(shelf::Column::Code)
        .all(&state.db)
        .await?;

    let mut out = Vec::with_capacity(shelves.len());
    for s in shelves {
        let occupied = location::shelf_occupancy(&state.db, s.id).await?;
        out.push(ShelfResponse::new(s, occupied));
    }
    Ok(ApiResponse::success(out))
}

/// Add a shelf to a cabinet (supervisor or above).
#[utoipa::path(
    post,
    path = "/api/room/{room_code}/shelves",
    params(("room_code" = String, Path, description = "Room of the session")),
    request_body = CreateShelfRequest,
    responses(
        (status = 200, description = "Shelf created", body = ApiResponse<ShelfResponse>),
        (status = 404, description = "Cabinet not found"),
        (status = 422, description = "Capacity below 1")
    ),
    tag = "locations"
)]
pub async fn create_shelf(
    State(state): State<AppState>,
    session: RoomSession,
    Json(payload): Json<CreateShelfRequest>,
) -> Result<ApiResponse<ShelfResponse>, KartelaError> {
    session.require_role(Role::Supervisor)?;
    payload.validate()?;

    cabinet::Entity::find_by_id(payload.cabinet_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            KartelaError::NotFound(format!("Cabinet with id {} not found", payload.cabinet_id))
        })?;

    let txn = state.db.begin().await?;
    let created = shelf::ActiveModel {
        cabinet_id: Set(payload.cabinet_id),
        code: Set(payload.code.trim().to_string()),
        capacity: Set(payload.capacity),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    audit::record_system(
        &txn,
        Some(session.user_id),
        "SHELF_CREATED",
        "shelf",
        Some(created.id),
        Some(created.code.clone()),
    )
    .await?;
    txn.commit().await?;

    Ok(ApiResponse::success(ShelfResponse::new(created, 0)))
}

/// Cells of a shelf with their occupancy.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/shelves/{id}/cells",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Shelf ID")
    ),
    responses(
        (status = 200, description = "Cells", body = ApiResponse<Vec<CellResponse>>),
        (status = 404, description = "Shelf not found")
    ),
    tag = "locations"
)]
pub async fn list_cells(
    State(state): State<AppState>,
    Path((_room_code, id)): Path<(String, i32)>,
) -> Result<ApiResponse<Vec<CellResponse>>, KartelaError> {
    shelf::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| KartelaError::NotFound(format!("Shelf with id {} not found", id)))?;

    let cells = cell::Entity::find()
        .filter(cell::Column::ShelfId.eq(id))
        .order_by_asc(cell::Column::Code)
        .all(&state.db)
        .await?;

    let mut out = Vec::with_capacity(cells.len());
    for c in cells {
        let occupied = location::cell_occupancy(&state.db, c.id).await?;
        out.push(CellResponse::new(c, occupied));
    }
    Ok(ApiResponse::success(out))
}

/// Add a cell to a shelf (supervisor or above).
#[utoipa::path(
    post,
    path = "/api/room/{room_code}/cells",
    params(("room_code" = String, Path, description = "Room of the session")),
    request_body = CreateCellRequest,
    responses(
        (status = 200, description = "Cell created", body = ApiResponse<CellResponse>),
        (status = 404, description = "Shelf not found"),
        (status = 422, description = "Capacity below 1")
    ),
    tag = "locations"
)]
pub async fn create_cell(
    State(state): State<AppState>,
    session: RoomSession,
    Json(payload): Json<CreateCellRequest>,
) -> Result<ApiResponse<CellResponse>, KartelaError> {
    session.require_role(Role::Supervisor)?;
    payload.validate()?;

    shelf::Entity::find_by_id(payload.shelf_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            KartelaError::NotFound(format!("Shelf with id {} not found", payload.shelf_id))
        })?;

    let txn = state.db.begin().await?;
    let created = cell::ActiveModel {
        shelf_id: Set(payload.shelf_id),
        code: Set(payload.code.trim().to_string()),
        capacity: Set(payload.capacity),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    audit::record_system(
        &txn,
        Some(session.user_id),
        "CELL_CREATED",
        "cell",
        Some(created.id),
        Some(created.code.clone()),
    )
    .await?;
    txn.commit().await?;

    Ok(ApiResponse::success(CellResponse::new(created, 0)))
}

/// A cell with its occupancy and the swatches stored in it.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/cells/{id}",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Cell ID")
    ),
    responses(
        (status = 200, description = "Cell found", body = ApiResponse<CellDetail>),
        (status = 404, description = "Cell not found")
    ),
    tag = "locations"
)]
pub async fn get_cell(
    State(state): State<AppState>,
    Path((_room_code, id)): Path<(String, i32)>,
) -> Result<ApiResponse<CellDetail>, KartelaError> {
    let found = location::find_cell(&state.db, id).await?;
    let swatches = swatch::Entity::find()
        .filter(swatch::Column::CellId.eq(id))
        .filter(swatch::Column::IsDeleted.eq(false))
        .order_by_asc(swatch::Column::Number)
        .all(&state.db)
        .await?;

    Ok(ApiResponse::success(CellDetail {
        cell: CellResponse::new(found, swatches.len() as u64),
        swatches: swatches.into_iter().map(SwatchResponse::from).collect(),
    }))
}
