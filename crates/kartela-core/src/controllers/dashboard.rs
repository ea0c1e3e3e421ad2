use axum::extract::State;
use axum::{Router, routing::get};

use crate::error::KartelaError;
use crate::extractors::RoomSession;
use crate::models::user::Role;
use crate::response::ApiResponse;
use crate::services::dashboard::{
    self, ManagerDashboard, RoomDashboard, SupervisorDashboard,
};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(room_dashboard))
        .route("/dashboard/supervisor", get(supervisor_dashboard))
        .route("/dashboard/manager", get(manager_dashboard))
}

/// Overview of the session's room.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/dashboard",
    params(("room_code" = String, Path, description = "Room of the session")),
    responses(
        (status = 200, description = "Room overview", body = ApiResponse<RoomDashboard>),
        (status = 401, description = "No valid session")
    ),
    tag = "dashboard"
)]
pub async fn room_dashboard(
    State(state): State<AppState>,
    session: RoomSession,
) -> Result<ApiResponse<RoomDashboard>, KartelaError> {
    let data = dashboard::room_dashboard(&state.db, &session).await?;
    Ok(ApiResponse::success(data))
}

/// Global status counts, full cells and recent movements.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/dashboard/supervisor",
    params(("room_code" = String, Path, description = "Room of the session")),
    responses(
        (status = 200, description = "Supervisor overview", body = ApiResponse<SupervisorDashboard>),
        (status = 403, description = "Supervisor role required")
    ),
    tag = "dashboard"
)]
pub async fn supervisor_dashboard(
    State(state): State<AppState>,
    session: RoomSession,
) -> Result<ApiResponse<SupervisorDashboard>, KartelaError> {
    session.require_role(Role::Supervisor)?;
    let data = dashboard::supervisor_dashboard(&state.db).await?;
    Ok(ApiResponse::success(data))
}

/// Totals, per-room counts and the latest system-log rows.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/dashboard/manager",
    params(("room_code" = String, Path, description = "Room of the session")),
    responses(
        (status = 200, description = "Manager overview", body = ApiResponse<ManagerDashboard>),
        (status = 403, description = "Manager role required")
    ),
    tag = "dashboard"
)]
pub async fn manager_dashboard(
    State(state): State<AppState>,
    session: RoomSession,
) -> Result<ApiResponse<ManagerDashboard>, KartelaError> {
    session.require_role(Role::Manager)?;
    let data = dashboard::manager_dashboard(&state.db).await?;
    Ok(ApiResponse::success(data))
}
