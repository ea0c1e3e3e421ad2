use axum::extract::{Path, State};
use axum::{Router, routing::{delete, get, patch}};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::session;
use crate::error::KartelaError;
use crate::extractors::{AdminSession, Json, Pagination, Query};
use crate::models::permission::{self, PermissionResponse};
use crate::models::room::{self, RoomResponse};
use crate::models::system_log::{self, SystemLogResponse};
use crate::models::user::{self, Role, UserResponse};
use crate::response::{ApiResponse, Page};
use crate::services::audit;

use super::AppState;

// ── Request types ──

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 64, message = "code is required"))]
    pub code: String,
    #[validate(length(min = 1, max = 128, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 256, message = "badge QR code is required"))]
    pub qr_code: String,
    /// `operator`, `supervisor` or `manager` (default: operator)
    pub role: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 64, message = "code is required"))]
    pub code: String,
    #[validate(length(min = 1, max = 128, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 256, message = "room QR code is required"))]
    pub qr_code: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoomRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GrantPermissionRequest {
    pub user_id: i32,
    pub room_id: i32,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PermissionQuery {
    pub user_id: Option<i32>,
    pub room_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RevokedResponse {
    pub id: i32,
    /// Open sessions closed by the revocation
    pub sessions_revoked: u64,
}

fn parse_role(value: &str) -> Result<Role, KartelaError> {
    value
        .parse::<Role>()
        .map_err(|e| KartelaError::Validation(e.to_string()))
}

// ── Routes ──

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users).post(create_user))
        .route("/admin/users/{id}", patch(update_user))
        .route("/admin/rooms", get(list_rooms).post(create_room))
        .route("/admin/rooms/{id}", patch(update_room))
        .route(
            "/admin/permissions",
            get(list_permissions).post(grant_permission),
        )
        .route("/admin/permissions/{id}", delete(revoke_permission))
        .route("/admin/system-logs", get(list_system_logs))
}

// ── Users ──

/// List all users.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/admin/users",
    params(("room_code" = String, Path, description = "Room of the session")),
    responses(
        (status = 200, description = "Users", body = ApiResponse<Vec<UserResponse>>),
        (status = 403, description = "Admin access required")
    ),
    tag = "admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<ApiResponse<Vec<UserResponse>>, KartelaError> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::Code)
        .all(&state.db)
        .await?;
    Ok(ApiResponse::success(
        users.into_iter().map(UserResponse::from).collect(),
    ))
}

/// Register a user and their badge.
#[utoipa::path(
    post,
    path = "/api/room/{room_code}/admin/users",
    params(("room_code" = String, Path, description = "Room of the session")),
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = ApiResponse<UserResponse>),
        (status = 409, description = "Code or badge already in use")
    ),
    tag = "admin"
)]
pub async fn create_user(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Json(payload): Json<CreateUserRequest>,
) -> Result<ApiResponse<UserResponse>, KartelaError> {
    payload.validate()?;
    let role = match payload.role.as_deref() {
        Some(r) => parse_role(r)?,
        None => Role::Operator,
    };
    let code = payload.code.trim().to_string();
    let qr_code = payload.qr_code.trim().to_string();

    let txn = state.db.begin().await?;
    let taken = user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Code.eq(code.as_str()))
                .add(user::Column::QrCode.eq(qr_code.as_str())),
        )
        .count(&txn)
        .await?;
    if taken > 0 {
        return Err(KartelaError::Conflict(
            "A user with this code or badge already exists".to_string(),
        ));
    }

    let now = Utc::now().naive_utc();
    let created = user::ActiveModel {
        code: Set(code),
        name: Set(payload.name.trim().to_string()),
        qr_code: Set(qr_code),
        role: Set(role.as_str().to_string()),
        is_active: Set(true),
        is_admin: Set(payload.is_admin),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    audit::record_system(
        &txn,
        Some(admin.user_id),
        "USER_CREATED",
        "user",
        Some(created.id),
        Some(created.code.clone()),
    )
    .await?;
    txn.commit().await?;

    tracing::info!(user = %created.code, admin_id = admin.user_id, "user created");
    Ok(ApiResponse::success(created.into()))
}

/// Change a user's name, role, admin flag or active state.
///
/// Deactivating a user closes all of their open sessions.
#[utoipa::path(
    patch,
    path = "/api/room/{room_code}/admin/users/{id}",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found")
    ),
    tag = "admin"
)]
pub async fn update_user(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path((_room_code, id)): Path<(String, i32)>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<ApiResponse<UserResponse>, KartelaError> {
    payload.validate()?;
    let role = payload.role.as_deref().map(parse_role).transpose()?;

    let txn = state.db.begin().await?;
    let current = user::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| KartelaError::NotFound(format!("User with id {} not found", id)))?;

    let mut changes = Vec::new();
    let mut active: user::ActiveModel = current.clone().into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
        changes.push("name".to_string());
    }
    if let Some(role) = role {
        active.role = Set(role.as_str().to_string());
        changes.push(format!("role={}", role));
    }
    if let Some(is_admin) = payload.is_admin {
        active.is_admin = Set(is_admin);
        changes.push(format!("is_admin={}", is_admin));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
        changes.push(format!("is_active={}", is_active));
    }
    active.updated_at = Set(Utc::now().naive_utc());
    let updated = active.update(&txn).await?;

    if current.is_active && !updated.is_active {
        let revoked = session::revoke_user_sessions(&txn, updated.id, None).await?;
        tracing::info!(user_id = updated.id, revoked, "sessions revoked for deactivated user");
    }
    audit::record_system(
        &txn,
        Some(admin.user_id),
        "USER_UPDATED",
        "user",
        Some(updated.id),
        Some(changes.join(", ")),
    )
    .await?;
    txn.commit().await?;

    Ok(ApiResponse::success(updated.into()))
}

// ── Rooms ──

/// List all rooms.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/admin/rooms",
    params(("room_code" = String, Path, description = "Room of the session")),
    responses(
        (status = 200, description = "Rooms", body = ApiResponse<Vec<RoomResponse>>),
        (status = 403, description = "Admin access required")
    ),
    tag = "admin"
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<ApiResponse<Vec<RoomResponse>>, KartelaError> {
    let rooms = room::Entity::find()
        .order_by_asc(room::Column::Code)
        .all(&state.db)
        .await?;
    Ok(ApiResponse::success(
        rooms.into_iter().map(RoomResponse::from).collect(),
    ))
}

/// Register a room and its door QR code.
#[utoipa::path(
    post,
    path = "/api/room/{room_code}/admin/rooms",
    params(("room_code" = String, Path, description = "Room of the session")),
    request_body = CreateRoomRequest,
    responses(
        (status = 200, description = "Room created", body = ApiResponse<RoomResponse>),
        (status = 409, description = "Code or QR code already in use")
    ),
    tag = "admin"
)]
pub async fn create_room(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Json(payload): Json<CreateRoomRequest>,
) -> Result<ApiResponse<RoomResponse>, KartelaError> {
    payload.validate()?;
    let code = payload.code.trim().to_string();
    let qr_code = payload.qr_code.trim().to_string();

    let txn = state.db.begin().await?;
    let taken = room::Entity::find()
        .filter(
            Condition::any()
                .add(room::Column::Code.eq(code.as_str()))
                .add(room::Column::QrCode.eq(qr_code.as_str())),
        )
        .count(&txn)
        .await?;
    if taken > 0 {
        return Err(KartelaError::Conflict(
            "A room with this code or QR code already exists".to_string(),
        ));
    }

    let created = room::ActiveModel {
        code: Set(code),
        name: Set(payload.name.trim().to_string()),
        qr_code: Set(qr_code),
        is_active: Set(true),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    audit::record_system(
        &txn,
        Some(admin.user_id),
        "ROOM_CREATED",
        "room",
        Some(created.id),
        Some(created.code.clone()),
    )
    .await?;
    txn.commit().await?;

    tracing::info!(room = %created.code, admin_id = admin.user_id, "room created");
    Ok(ApiResponse::success(created.into()))
}

/// Rename or (de)activate a room.
#[utoipa::path(
    patch,
    path = "/api/room/{room_code}/admin/rooms/{id}",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Room ID")
    ),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Room updated", body = ApiResponse<RoomResponse>),
        (status = 404, description = "Room not found")
    ),
    tag = "admin"
)]
pub async fn update_room(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path((_room_code, id)): Path<(String, i32)>,
    Json(payload): Json<UpdateRoomRequest>,
) -> Result<ApiResponse<RoomResponse>, KartelaError> {
    payload.validate()?;

    let txn = state.db.begin().await?;
    let current = room::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| KartelaError::NotFound(format!("Room with id {} not found", id)))?;

    let mut changes = Vec::new();
    let mut active: room::ActiveModel = current.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
        changes.push("name".to_string());
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
        changes.push(format!("is_active={}", is_active));
    }
    let updated = active.update(&txn).await?;
    audit::record_system(
        &txn,
        Some(admin.user_id),
        "ROOM_UPDATED",
        "room",
        Some(updated.id),
        Some(changes.join(", ")),
    )
    .await?;
    txn.commit().await?;

    Ok(ApiResponse::success(updated.into()))
}

// ── Permissions ──

/// List permission rows, optionally for one user or room.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/admin/permissions",
    params(("room_code" = String, Path, description = "Room of the session"), PermissionQuery),
    responses(
        (status = 200, description = "Permissions", body = ApiResponse<Vec<PermissionResponse>>)
    ),
    tag = "admin"
)]
pub async fn list_permissions(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<PermissionQuery>,
) -> Result<ApiResponse<Vec<PermissionResponse>>, KartelaError> {
    let mut find = permission::Entity::find();
    if let Some(user_id) = query.user_id {
        find = find.filter(permission::Column::UserId.eq(user_id));
    }
    if let Some(room_id) = query.room_id {
        find = find.filter(permission::Column::RoomId.eq(room_id));
    }
    let rows = find
        .order_by_asc(permission::Column::UserId)
        .order_by_asc(permission::Column::RoomId)
        .all(&state.db)
        .await?;
    Ok(ApiResponse::success(
        rows.into_iter().map(PermissionResponse::from).collect(),
    ))
}

/// Grant a user access to a room.
#[utoipa::path(
    post,
    path = "/api/room/{room_code}/admin/permissions",
    params(("room_code" = String, Path, description = "Room of the session")),
    request_body = GrantPermissionRequest,
    responses(
        (status = 200, description = "Permission granted", body = ApiResponse<PermissionResponse>),
        (status = 404, description = "User or room not found"),
        (status = 409, description = "Permission already exists")
    ),
    tag = "admin"
)]
pub async fn grant_permission(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Json(payload): Json<GrantPermissionRequest>,
) -> Result<ApiResponse<PermissionResponse>, KartelaError> {
    let txn = state.db.begin().await?;
    user::Entity::find_by_id(payload.user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| {
            KartelaError::NotFound(format!("User with id {} not found", payload.user_id))
        })?;
    room::Entity::find_by_id(payload.room_id)
        .one(&txn)
        .await?
        .ok_or_else(|| {
            KartelaError::NotFound(format!("Room with id {} not found", payload.room_id))
        })?;

    let existing = permission::Entity::find()
        .filter(permission::Column::UserId.eq(payload.user_id))
        .filter(permission::Column::RoomId.eq(payload.room_id))
        .count(&txn)
        .await?;
    if existing > 0 {
        return Err(KartelaError::Conflict(
            "User already has access to this room".to_string(),
        ));
    }

    let created = permission::ActiveModel {
        user_id: Set(payload.user_id),
        room_id: Set(payload.room_id),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    audit::record_system(
        &txn,
        Some(admin.user_id),
        "PERMISSION_GRANTED",
        "permission",
        Some(created.id),
        Some(format!("user={} room={}", created.user_id, created.room_id)),
    )
    .await?;
    txn.commit().await?;

    tracing::info!(
        user_id = created.user_id,
        room_id = created.room_id,
        admin_id = admin.user_id,
        "permission granted"
    );
    Ok(ApiResponse::success(created.into()))
}

/// Revoke a permission and close the user's sessions in that room.
#[utoipa::path(
    delete,
    path = "/api/room/{room_code}/admin/permissions/{id}",
    params(
        ("room_code" = String, Path, description = "Room of the session"),
        ("id" = i32, Path, description = "Permission ID")
    ),
    responses(
        (status = 200, description = "Permission revoked", body = ApiResponse<RevokedResponse>),
        (status = 404, description = "Permission not found")
    ),
    tag = "admin"
)]
pub async fn revoke_permission(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path((_room_code, id)): Path<(String, i32)>,
) -> Result<ApiResponse<RevokedResponse>, KartelaError> {
    let txn = state.db.begin().await?;
    let found = permission::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| KartelaError::NotFound(format!("Permission with id {} not found", id)))?;

    permission::Entity::delete_by_id(found.id).exec(&txn).await?;
    let sessions_revoked =
        session::revoke_user_sessions(&txn, found.user_id, Some(found.room_id)).await?;
    audit::record_system(
        &txn,
        Some(admin.user_id),
        "PERMISSION_REVOKED",
        "permission",
        Some(found.id),
        Some(format!("user={} room={}", found.user_id, found.room_id)),
    )
    .await?;
    txn.commit().await?;

    tracing::info!(
        user_id = found.user_id,
        room_id = found.room_id,
        sessions_revoked,
        "permission revoked"
    );
    Ok(ApiResponse::success(RevokedResponse {
        id: found.id,
        sessions_revoked,
    }))
}

// ── System log ──

/// System log, newest first.
#[utoipa::path(
    get,
    path = "/api/room/{room_code}/admin/system-logs",
    params(("room_code" = String, Path, description = "Room of the session"), Pagination),
    responses(
        (status = 200, description = "System log page", body = ApiResponse<Page<SystemLogResponse>>)
    ),
    tag = "admin"
)]
pub async fn list_system_logs(
    State(state): State<AppState>,
    _admin: AdminSession,
    pagination: Pagination,
) -> Result<ApiResponse<Page<SystemLogResponse>>, KartelaError> {
    let total = system_log::Entity::find().count(&state.db).await?;
    let rows = system_log::Entity::find()
        .order_by_desc(system_log::Column::CreatedAt)
        .order_by_desc(system_log::Column::Id)
        .offset(pagination.offset)
        .limit(pagination.limit)
        .all(&state.db)
        .await?;
    Ok(ApiResponse::success(Page {
        items: rows.into_iter().map(SystemLogResponse::from).collect(),
        total,
        limit: pagination.limit,
        offset: pagination.offset,
    }))
}
