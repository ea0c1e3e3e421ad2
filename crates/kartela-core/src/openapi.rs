use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme};

use crate::controllers::access::{
    BadgeScanRequest, BadgeScanResponse, BadgeUser, MessageResponse, RoomAccessResponse,
    RoomScanRequest,
};
use crate::controllers::admin::{
    CreateRoomRequest, CreateUserRequest, GrantPermissionRequest, RevokedResponse,
    UpdateRoomRequest, UpdateUserRequest,
};
use crate::controllers::customers::{CreateCustomerRequest, UpdateCustomerRequest};
use crate::controllers::locations::{
    CellDetail, CreateCabinetRequest, CreateCellRequest, CreateShelfRequest,
};
use crate::controllers::swatches::{
    AssignRequest, CreateSwatchRequest, DeletedResponse, ResetRequest, ScanRequest,
    StatusChangeRequest, TransferRequest, UpdateSwatchRequest,
};
use crate::error::{ErrorDetail, FieldError};
use crate::extractors::SessionInfo;
use crate::models::cabinet::CabinetResponse;
use crate::models::cell::CellResponse;
use crate::models::customer::CustomerResponse;
use crate::models::movement_log::MovementResponse;
use crate::models::permission::PermissionResponse;
use crate::models::room::RoomResponse;
use crate::models::shelf::ShelfResponse;
use crate::models::swatch::{SwatchResponse, SwatchStatus};
use crate::models::system_log::SystemLogResponse;
use crate::models::user::{Role, UserResponse};
use crate::routing::HealthResponse;
use crate::services::dashboard::{
    ManagerDashboard, RoomDashboard, RoomSwatchCount, StatusCounts, SupervisorDashboard, Totals,
};

/// OpenAPI document for the Kartela API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kartela Takip Sistemi API",
        version = "0.3.0",
        description = "Room access control and colour-swatch archive tracking."
    ),
    paths(
        crate::routing::health,
        crate::controllers::access::scan_badge,
        crate::controllers::access::scan_room,
        crate::controllers::access::current_session,
        crate::controllers::access::logout,
        crate::controllers::swatches::list_swatches,
        crate::controllers::swatches::create_swatch,
        crate::controllers::swatches::get_swatch,
        crate::controllers::swatches::update_swatch,
        crate::controllers::swatches::delete_swatch,
        crate::controllers::swatches::transfer_swatch,
        crate::controllers::swatches::reset_swatch,
        crate::controllers::swatches::fill_slot,
        crate::controllers::swatches::assign_customer,
        crate::controllers::swatches::change_status,
        crate::controllers::swatches::list_movements,
        crate::controllers::swatches::qr_payload,
        crate::controllers::swatches::scan_swatch,
        crate::controllers::customers::list_customers,
        crate::controllers::customers::get_customer,
        crate::controllers::customers::create_customer,
        crate::controllers::customers::update_customer,
        crate::controllers::customers::customer_swatches,
        crate::controllers::locations::list_cabinets,
        crate::controllers::locations::create_cabinet,
        crate::controllers::locations::list_shelves,
        crate::controllers::locations::create_shelf,
        crate::controllers::locations::list_cells,
        crate::controllers::locations::create_cell,
        crate::controllers::locations::get_cell,
        crate::controllers::dashboard::room_dashboard,
        crate::controllers::dashboard::supervisor_dashboard,
        crate::controllers::dashboard::manager_dashboard,
        crate::controllers::admin::list_users,
        crate::controllers::admin::create_user,
        crate::controllers::admin::update_user,
        crate::controllers::admin::list_rooms,
        crate::controllers::admin::create_room,
        crate::controllers::admin::update_room,
        crate::controllers::admin::list_permissions,
        crate::controllers::admin::grant_permission,
        crate::controllers::admin::revoke_permission,
        crate::controllers::admin::list_system_logs,
    ),
    components(
        schemas(
            ErrorDetail,
            FieldError,
            HealthResponse,
            SessionInfo,
            BadgeScanRequest,
            BadgeScanResponse,
            BadgeUser,
            RoomScanRequest,
            RoomAccessResponse,
            MessageResponse,
            SwatchStatus,
            SwatchResponse,
            CreateSwatchRequest,
            UpdateSwatchRequest,
            TransferRequest,
            ResetRequest,
            AssignRequest,
            StatusChangeRequest,
            ScanRequest,
            DeletedResponse,
            MovementResponse,
            CustomerResponse,
            CreateCustomerRequest,
            UpdateCustomerRequest,
            CabinetResponse,
            ShelfResponse,
            CellResponse,
            CellDetail,
            CreateCabinetRequest,
            CreateShelfRequest,
            CreateCellRequest,
            StatusCounts,
            RoomDashboard,
            SupervisorDashboard,
            ManagerDashboard,
            Totals,
            RoomSwatchCount,
            Role,
            UserResponse,
            RoomResponse,
            PermissionResponse,
            SystemLogResponse,
            CreateUserRequest,
            UpdateUserRequest,
            CreateRoomRequest,
            UpdateRoomRequest,
            GrantPermissionRequest,
            RevokedResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "access", description = "Badge and room scans, room sessions"),
        (name = "swatches", description = "Swatch search, lifecycle and movements"),
        (name = "customers", description = "Customers and their swatches"),
        (name = "locations", description = "Cabinets, shelves and cells"),
        (name = "dashboard", description = "Operator, supervisor and manager overviews"),
        (name = "admin", description = "Users, rooms, permissions and the system log")
    ),
    security(
        ("room_session" = []),
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Register the session cookie and the equivalent bearer scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "room_session",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("room_session"))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
