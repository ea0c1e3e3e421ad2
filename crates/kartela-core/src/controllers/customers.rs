use axum::extract::{Path, State};
use axum::{Router, routing::get};
use sea_orm::TransactionTrait;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::KartelaError;
use crate::extractors::{Json, Pagination, Query, RoomSession};
use crate::models::customer::CustomerResponse;
use crate::models::swatch::SwatchResponse;
use crate::models::user::Role;
use crate::response::{ApiResponse, Page};
use crate::services::{audit, customer as customers};

use super::AppState;

// ── Request types ──

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CustomerQuery {
    /// Substring of name or code (2+ characters)
    pub q: Option<String>,
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 64, message = "code is required"))]
    pub code: String,
    #[validate(length(min = 1, max = 256, message = "name is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

// ── Routes ──

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/{id}", get(get_customer).put(update_customer))
        .route("/customers/{id}/swatches", get(customer_swatches))
}

// ── Handlers ──

/// List or search customers.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/customers",
    params(("room_code" = String, Path, description = "Room of the session"), CustomerQuery, Pagination),
    responses(
        (status = 200, description = "Customers with swatch counts", body = ApiResponse<Page<CustomerResponse>>)
    ),
    tag = "customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
    pagination: Pagination,
) -> Result<ApiResponse<Page<CustomerResponse>>, KartelaError> {
    let (rows, total) =
        customers::search(&state.db, query.q.as_deref(), query.active_only, &pagination).await?;
    let items = customers::with_counts(&state.db, rows).await?;
    Ok(ApiResponse::success(Page {
        items,
        total,
        limit: pagination.limit,
        offset: pagination.offset,
    }))
}

/// Get one customer.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/customers/{id}",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer found", body = ApiResponse<CustomerResponse>),
        (status = 404, description = "Customer not found")
    ),
    tag = "customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path((_room_code, id)): Path<(String, i32)>,
) -> Result<ApiResponse<CustomerResponse>, KartelaError> {
    let found = customers::find(&state.db, id).await?;
    let mut with_counts = customers::with_counts(&state.db, vec![found]).await?;
    with_counts
        .pop()
        .map(ApiResponse::success)
        .ok_or_else(|| KartelaError::NotFound(format!("Customer with id {} not found", id)))
}

/// Create a customer (supervisor or above).
#[utoipa::path(
    post,
    path = "/api/room/{room_code}/customers",
    params(("room_code" = String, Path, description = "Room of the session")),
    request_body = CreateCustomerRequest,
    responses(
        (status = 200, description = "Customer created", body = ApiResponse<CustomerResponse>),
        (status = 409, description = "Code already exists")
    ),
    tag = "customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    session: RoomSession,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<ApiResponse<CustomerResponse>, KartelaError> {
    session.require_role(Role::Supervisor)?;
    payload.validate()?;

    let txn = state.db.begin().await?;
    let created = customers::create(&txn, &payload.code, &payload.name).await?;
    audit::record_system(
        &txn,
        Some(session.user_id),
        "CUSTOMER_CREATED",
        "customer",
        Some(created.id),
        Some(created.code.clone()),
    )
    .await?;
    txn.commit().await?;
    tracing::info!(customer = %created.code, user_id = session.user_id, "customer created");

    Ok(ApiResponse::success(CustomerResponse::new(created, 0, 0)))
}

/// Rename or (de)activate a customer (supervisor or above).
#[utoipa::path(
    put,
    path = "/api/room/{room_code}/customers/{id}",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Customer ID")
    ),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = ApiResponse<CustomerResponse>),
        (status = 404, description = "Customer not found")
    ),
    tag = "customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    session: RoomSession,
    Path((_room_code, id)): Path<(String, i32)>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> Result<ApiResponse<CustomerResponse>, KartelaError> {
    session.require_role(Role::Supervisor)?;
    payload.validate()?;

    let txn = state.db.begin().await?;
    let updated = customers::update(&txn, id, payload.name, payload.is_active).await?;
    audit::record_system(
        &txn,
        Some(session.user_id),
        "CUSTOMER_UPDATED",
        "customer",
        Some(updated.id),
        None,
    )
    .await?;
    txn.commit().await?;

    let mut with_counts = customers::with_counts(&state.db, vec![updated]).await?;
    with_counts
        .pop()
        .map(ApiResponse::success)
        .ok_or_else(|| KartelaError::NotFound(format!("Customer with id {} not found", id)))
}

/// Swatches assigned to a customer.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/customers/{id}/swatches",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Assigned swatches", body = ApiResponse<Vec<SwatchResponse>>),
        (status = 404, description = "Customer not found")
    ),
    tag = "customers"
)]
pub async fn customer_swatches(
    State(state): State<AppState>,
    Path((_room_code, id)): Path<(String, i32)>,
) -> Result<ApiResponse<Vec<SwatchResponse>>, KartelaError> {
    let rows = customers::swatches(&state.db, id).await?;
    Ok(ApiResponse::success(
        rows.into_iter().map(SwatchResponse::from).collect(),
    ))
}
