use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Router, routing::{get, post}};
use chrono::Local;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::KartelaError;
use crate::extractors::{Json, Pagination, Query, RoomSession};
use crate::models::movement_log::MovementResponse;
use crate::models::swatch::{SwatchResponse, SwatchStatus};
use crate::models::user::Role;
use crate::response::{ApiResponse, Page};
use crate::services::location;
use crate::services::swatch::{self as swatches, NewSwatch, SwatchChanges, SwatchFilter};
use crate::services::Actor;

use super::AppState;

// ── Request types ──

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SwatchQuery {
    /// Substring of number, colour code or colour name (2+ characters)
    pub q: Option<String>,
    pub status: Option<SwatchStatus>,
    pub customer_id: Option<i32>,
    pub cell_id: Option<i32>,
    /// Only swatches stored in the session's room
    #[serde(default)]
    pub in_room: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSwatchRequest {
    #[validate(length(min = 1, max = 64, message = "number is required"))]
    pub number: String,
    #[validate(length(min = 1, max = 64, message = "color code is required"))]
    pub color_code: String,
    #[validate(length(min = 1, max = 128, message = "color name is required"))]
    pub color_name: String,
    #[validate(length(max = 64))]
    pub pantone_code: Option<String>,
    #[validate(range(min = 1, max = 1000, message = "slots_max must be between 1 and 1000"))]
    pub slots_max: i32,
    pub cell_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSwatchRequest {
    #[validate(length(min = 1, max = 64))]
    pub color_code: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub color_name: Option<String>,
    #[validate(length(max = 64))]
    pub pantone_code: Option<String>,
    #[validate(range(min = 1, max = 1000, message = "slots_max must be between 1 and 1000"))]
    pub slots_max: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TransferRequest {
    pub target_cell_id: i32,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetRequest {
    /// Why the swatch is returned to circulation
    #[validate(length(min = 1, max = 64, message = "reason is required"))]
    pub reason_code: String,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignRequest {
    pub customer_id: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StatusChangeRequest {
    pub status: SwatchStatus,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScanRequest {
    /// Text read from a swatch QR label
    #[validate(length(min = 1, max = 2048, message = "payload is required"))]
    pub payload: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub id: i32,
    pub deleted: bool,
}

// ── Routes ──

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/swatches", get(list_swatches).post(create_swatch))
        .route("/swatches/scan", post(scan_swatch))
        .route(
            "/swatches/{id}",
            get(get_swatch).put(update_swatch).delete(delete_swatch),
        )
        .route("/swatches/{id}/transfer", post(transfer_swatch))
        .route("/swatches/{id}/reset", post(reset_swatch))
        .route("/swatches/{id}/fill-slot", post(fill_slot))
        .route("/swatches/{id}/assign", post(assign_customer))
        .route("/swatches/{id}/status", post(change_status))
        .route("/swatches/{id}/movements", get(list_movements))
        .route("/swatches/{id}/qr", get(qr_payload))
}

// ── Handlers ──

/// Search swatches.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/swatches",
    params(("room_code" = String, Path, description = "Room of the session"), SwatchQuery, Pagination),
    responses(
        (status = 200, description = "Matching swatches", body = ApiResponse<Page<SwatchResponse>>),
        (status = 401, description = "No valid session")
    ),
    tag = "swatches"
)]
pub async fn list_swatches(
    State(state): State<AppState>,
    session: RoomSession,
    Query(query): Query<SwatchQuery>,
    pagination: Pagination,
) -> Result<ApiResponse<Page<SwatchResponse>>, KartelaError> {
    let cell_ids = if query.in_room {
        Some(location::room_cell_ids(&state.db, session.room_id).await?)
    } else {
        None
    };
    let filter = SwatchFilter {
        q: query.q,
        status: query.status,
        customer_id: query.customer_id,
        cell_id: query.cell_id,
        cell_ids,
    };

    let (items, total) = swatches::search(&state.db, &filter, &pagination).await?;
    Ok(ApiResponse::success(Page {
        items: items.into_iter().map(SwatchResponse::from).collect(),
        total,
        limit: pagination.limit,
        offset: pagination.offset,
    }))
}

/// Create a swatch, optionally placing it into a cell.
#[utoipa::path(
    post,
    path = "/api/room/{room_code}/swatches",
    params(("room_code" = String, Path, description = "Room of the session")),
    request_body = CreateSwatchRequest,
    responses(
        (status = 200, description = "Swatch created", body = ApiResponse<SwatchResponse>),
        (status = 409, description = "Duplicate number or full cell"),
        (status = 422, description = "Invalid input")
    ),
    tag = "swatches"
)]
pub async fn create_swatch(
    State(state): State<AppState>,
    session: RoomSession,
    Json(payload): Json<CreateSwatchRequest>,
) -> Result<ApiResponse<SwatchResponse>, KartelaError> {
    payload.validate()?;
    let created = swatches::create(
        &state.db,
        Actor::from(&session),
        NewSwatch {
            number: payload.number,
            color_code: payload.color_code,
            color_name: payload.color_name,
            pantone_code: payload.pantone_code,
            slots_max: payload.slots_max,
            cell_id: payload.cell_id,
        },
    )
    .await?;
    Ok(ApiResponse::success(created.into()))
}

/// Get a single swatch.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/swatches/{id}",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Swatch ID")
    ),
    responses(
        (status = 200, description = "Swatch found", body = ApiResponse<SwatchResponse>),
        (status = 404, description = "Swatch not found")
    ),
    tag = "swatches"
)]
pub async fn get_swatch(
    State(state): State<AppState>,
    Path((_room_code, id)): Path<(String, i32)>,
) -> Result<ApiResponse<SwatchResponse>, KartelaError> {
    let swatch = swatches::find_live(&state.db, id).await?;
    Ok(ApiResponse::success(swatch.into()))
}

/// Update colour data or the slot count.
#[utoipa::path(
    put,
    path = "/api/room/{room_code}/swatches/{id}",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Swatch ID")
    ),
    request_body = UpdateSwatchRequest,
    responses(
        (status = 200, description = "Swatch updated", body = ApiResponse<SwatchResponse>),
        (status = 404, description = "Swatch not found"),
        (status = 422, description = "slots_max below used slots")
    ),
    tag = "swatches"
)]
pub async fn update_swatch(
    State(state): State<AppState>,
    session: RoomSession,
    Path((_room_code, id)): Path<(String, i32)>,
    Json(payload): Json<UpdateSwatchRequest>,
) -> Result<ApiResponse<SwatchResponse>, KartelaError> {
    payload.validate()?;
    let updated = swatches::update(
        &state.db,
        Actor::from(&session),
        id,
        SwatchChanges {
            color_code: payload.color_code,
            color_name: payload.color_name,
            pantone_code: payload.pantone_code,
            slots_max: payload.slots_max,
        },
    )
    .await?;
    Ok(ApiResponse::success(updated.into()))
}

/// Soft-delete a swatch (supervisor or above).
#[utoipa::path(
    delete,
    path = "/api/room/{room_code}/swatches/{id}",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Swatch ID")
    ),
    responses(
        (status = 200, description = "Swatch deleted", body = ApiResponse<DeletedResponse>),
        (status = 403, description = "Supervisor role required"),
        (status = 404, description = "Swatch not found")
    ),
    tag = "swatches"
)]
pub async fn delete_swatch(
    State(state): State<AppState>,
    session: RoomSession,
    Path((_room_code, id)): Path<(String, i32)>,
) -> Result<ApiResponse<DeletedResponse>, KartelaError> {
    session.require_role(Role::Supervisor)?;
    swatches::soft_delete(&state.db, Actor::from(&session), id).await?;
    Ok(ApiResponse::success(DeletedResponse { id, deleted: true }))
}

/// Move a swatch into another cell.
#[utoipa::path(
    post,
    path = "/api/room/{room_code}/swatches/{id}/transfer",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Swatch ID")
    ),
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Swatch transferred", body = ApiResponse<SwatchResponse>),
        (status = 400, description = "Already in the target cell"),
        (status = 404, description = "Swatch or cell not found"),
        (status = 409, description = "Target cell or shelf is full, or swatch out of use")
    ),
    tag = "swatches"
)]
pub async fn transfer_swatch(
    State(state): State<AppState>,
    session: RoomSession,
    Path((_room_code, id)): Path<(String, i32)>,
    Json(payload): Json<TransferRequest>,
) -> Result<ApiResponse<SwatchResponse>, KartelaError> {
    payload.validate()?;
    let moved = swatches::transfer(
        &state.db,
        Actor::from(&session),
        id,
        payload.target_cell_id,
        payload.note,
    )
    .await?;
    Ok(ApiResponse::success(moved.into()))
}

/// Reset a swatch: empty slots, no customer, `AKTIF`.
#[utoipa::path(
    post,
    path = "/api/room/{room_code}/swatches/{id}/reset",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Swatch ID")
    ),
    request_body = ResetRequest,
    responses(
        (status = 200, description = "Swatch reset", body = ApiResponse<SwatchResponse>),
        (status = 404, description = "Swatch not found"),
        (status = 422, description = "Reason missing")
    ),
    tag = "swatches"
)]
pub async fn reset_swatch(
    State(state): State<AppState>,
    session: RoomSession,
    Path((_room_code, id)): Path<(String, i32)>,
    Json(payload): Json<ResetRequest>,
) -> Result<ApiResponse<SwatchResponse>, KartelaError> {
    payload.validate()?;
    let reset = swatches::reset(
        &state.db,
        Actor::from(&session),
        id,
        &payload.reason_code,
        payload.note,
    )
    .await?;
    Ok(ApiResponse::success(reset.into()))
}

/// Use one slot of a swatch.
#[utoipa::path(
    post,
    path = "/api/room/{room_code}/swatches/{id}/fill-slot",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Swatch ID")
    ),
    responses(
        (status = 200, description = "Slot used", body = ApiResponse<SwatchResponse>),
        (status = 409, description = "Swatch is not AKTIF")
    ),
    tag = "swatches"
)]
pub async fn fill_slot(
    State(state): State<AppState>,
    session: RoomSession,
    Path((_room_code, id)): Path<(String, i32)>,
) -> Result<ApiResponse<SwatchResponse>, KartelaError> {
    let filled = swatches::fill_slot(&state.db, Actor::from(&session), id).await?;
    Ok(ApiResponse::success(filled.into()))
}

/// Assign a swatch to a customer.
#[utoipa::path(
    post,
    path = "/api/room/{room_code}/swatches/{id}/assign",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Swatch ID")
    ),
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Swatch assigned", body = ApiResponse<SwatchResponse>),
        (status = 404, description = "Swatch or customer not found"),
        (status = 409, description = "Customer inactive or swatch archived")
    ),
    tag = "swatches"
)]
pub async fn assign_customer(
    State(state): State<AppState>,
    session: RoomSession,
    Path((_room_code, id)): Path<(String, i32)>,
    Json(payload): Json<AssignRequest>,
) -> Result<ApiResponse<SwatchResponse>, KartelaError> {
    let assigned =
        swatches::assign_customer(&state.db, Actor::from(&session), id, payload.customer_id)
            .await?;
    Ok(ApiResponse::success(assigned.into()))
}

/// Move a swatch along its status lifecycle.
#[utoipa::path(
    post,
    path = "/api/room/{room_code}/swatches/{id}/status",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Swatch ID")
    ),
    request_body = StatusChangeRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<SwatchResponse>),
        (status = 409, description = "Transition not allowed")
    ),
    tag = "swatches"
)]
pub async fn change_status(
    State(state): State<AppState>,
    session: RoomSession,
    Path((_room_code, id)): Path<(String, i32)>,
    Json(payload): Json<StatusChangeRequest>,
) -> Result<ApiResponse<SwatchResponse>, KartelaError> {
    payload.validate()?;
    let changed = swatches::change_status(
        &state.db,
        Actor::from(&session),
        id,
        payload.status,
        payload.reason,
    )
    .await?;
    Ok(ApiResponse::success(changed.into()))
}

/// Movement history of a swatch, newest first.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/swatches/{id}/movements",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Swatch ID")
    ),
    responses(
        (status = 200, description = "Movement log", body = ApiResponse<Vec<MovementResponse>>),
        (status = 404, description = "Swatch not found")
    ),
    tag = "swatches"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    Path((_room_code, id)): Path<(String, i32)>,
) -> Result<ApiResponse<Vec<MovementResponse>>, KartelaError> {
    let rows = swatches::movements(&state.db, id).await?;
    Ok(ApiResponse::success(
        rows.into_iter().map(MovementResponse::from).collect(),
    ))
}

/// Text payload for the swatch's QR label.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/swatches/{id}/qr",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Swatch ID")
    ),
    responses(
        (status = 200, description = "QR payload", body = String, content_type = "text/plain"),
        (status = 404, description = "Swatch not found")
    ),
    tag = "swatches"
)]
pub async fn qr_payload(
    State(state): State<AppState>,
    Path((_room_code, id)): Path<(String, i32)>,
) -> Result<impl IntoResponse, KartelaError> {
    let payload = swatches::qr_payload(&state.db, id, Local::now().date_naive()).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        payload.encode(),
    ))
}

/// Resolve a scanned QR label to its swatch.
#[utoipa::path(
    post,
    path = "/api/room/{room_code}/swatches/scan",
    params(("room_code" = String, Path, description = "Room of the session")),
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Swatch found", body = ApiResponse<SwatchResponse>),
        (status = 400, description = "Malformed payload"),
        (status = 404, description = "Swatch not found")
    ),
    tag = "swatches"
)]
pub async fn scan_swatch(
    State(state): State<AppState>,
    Json(payload): Json<ScanRequest>,
) -> Result<ApiResponse<SwatchResponse>, KartelaError> {
    payload.validate()?;
    let swatch = swatches::scan(&state.db, &payload.payload, Local::now().date_naive()).await?;
    Ok(ApiResponse::success(swatch.into()))
}
