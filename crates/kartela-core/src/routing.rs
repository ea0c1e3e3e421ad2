use axum::extract::State;
use axum::routing::get;
use axum::{Router, middleware};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::room_guard;
use crate::controllers::{AppState, access, admin, customers, dashboard, locations, swatches};
use crate::error::KartelaError;
use crate::response::ApiResponse;

/// Prefix of every route that needs a room session.
pub const ROOM_PREFIX: &str = "/api/room/{room_code}";

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

/// Liveness plus a database round trip.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service and database reachable", body = ApiResponse<HealthResponse>),
        (status = 500, description = "Database unreachable")
    ),
    tag = "health"
)]
pub async fn health(
    State(state): State<AppState>,
) -> Result<ApiResponse<HealthResponse>, KartelaError> {
    state.db.ping().await?;
    Ok(ApiResponse::success(HealthResponse {
        status: "ok",
        database: "ok",
    }))
}

/// Build the application routes.
///
/// Access endpoints are public; everything under [`ROOM_PREFIX`] goes
/// through [`room_guard`].
pub fn build_routes(state: AppState) -> Router<AppState> {
    let room_routes = Router::new()
        .merge(swatches::routes())
        .merge(customers::routes())
        .merge(locations::routes())
        .merge(dashboard::routes())
        .merge(admin::routes())
        .route_layer(middleware::from_fn_with_state(state, room_guard));

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/access", access::routes())
        .nest(ROOM_PREFIX, room_routes)
}
