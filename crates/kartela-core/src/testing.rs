//! In-process test harness.
//!
//! Builds the real router over an in-memory SQLite database and drives it
//! with `tower::ServiceExt::oneshot`, so no port is bound.
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn test_dashboard() {
//!     let app = TestApp::new().await;
//!     let user = app.seed_user("USER-0001", "Ayşe", Role::Operator, false).await;
//!     let room = app.seed_room("ROOM-0001", "Arşiv").await;
//!     app.grant(user.id, room.id).await;
//!     let token = app.login("USER-0001", "ROOM-0001").await;
//!     let res = app.get_auth("/api/room/ROOM-0001/dashboard", &token).await;
//!     assert_eq!(res.status, 200);
//! }
//! ```

use std::net::SocketAddr;

use axum::Router;
use axum::body::Body;
use axum::Extension;
use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Method, Request, header};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tower::ServiceExt;

use crate::auth::SESSION_COOKIE;
use crate::config::{AccessConfig, Config};
use crate::controllers::AppState;
use crate::models::swatch::SwatchStatus;
use crate::models::user::Role;
use crate::models::{cabinet, cell, customer, permission, room, shelf, swatch, user};

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing";

/// Socket peer every test request appears to come from.
pub const TEST_PEER: ([u8; 4], u16) = ([127, 0, 0, 1], 40000);

/// A test application backed by an in-memory SQLite database.
pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub config: Config,
    pub state: AppState,
}

/// Configuration used by [`TestApp::new`]: in-memory database, rate
/// limiting off.
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        environment: "test".to_string(),
        access: AccessConfig {
            enable_rate_limit: false,
            ..AccessConfig::default()
        },
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let app = crate::App::with_config(config)
            .await
            .expect("Failed to create test app");
        TestApp {
            router: app
                .router()
                .layer(Extension(ConnectInfo(SocketAddr::from(TEST_PEER)))),
            state: app.state(),
            db: app.db,
            config: app.config,
        }
    }

    // ── Requests ──

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let req = builder.body(body).expect("Failed to build request");
        self.send(req).await
    }

    /// Send a prebuilt request through the router.
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let res = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Router is infallible");
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None, None).await
    }

    pub async fn post(&self, path: &str, body: serde_json::Value) -> TestResponse {
        self.request(Method::POST, path, None, Some(body)).await
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> TestResponse {
        self.request(Method::GET, path, Some(token), None).await
    }

    pub async fn post_auth(&self, path: &str, token: &str, body: serde_json::Value) -> TestResponse {
        self.request(Method::POST, path, Some(token), Some(body)).await
    }

    pub async fn put_auth(&self, path: &str, token: &str, body: serde_json::Value) -> TestResponse {
        self.request(Method::PUT, path, Some(token), Some(body)).await
    }

    pub async fn patch_auth(&self, path: &str, token: &str, body: serde_json::Value) -> TestResponse {
        self.request(Method::PATCH, path, Some(token), Some(body)).await
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, path, Some(token), None).await
    }

    // ── Access flow ──

    /// Scan a badge and a room, returning the session token.
    pub async fn login(&self, badge: &str, room_code: &str) -> String {
        let res = self
            .post("/api/access/badge", serde_json::json!({ "code": badge }))
            .await;
        assert_eq!(res.status, 200, "Badge scan failed: {}", res.body);
        let ticket = res.data()["badge_ticket"]
            .as_str()
            .expect("badge_ticket missing")
            .to_string();

        let res = self
            .post(
                "/api/access/room",
                serde_json::json!({ "badge_ticket": ticket, "room_code": room_code }),
            )
            .await;
        assert_eq!(res.status, 200, "Room scan failed: {}", res.body);
        res.data()["token"]
            .as_str()
            .expect("token missing")
            .to_string()
    }

    // ── Seed data ──

    pub async fn seed_user(&self, code: &str, name: &str, role: Role, is_admin: bool) -> user::Model {
        let now = Utc::now().naive_utc();
        user::ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            qr_code: Set(format!("QR-{}", code)),
            role: Set(role.as_str().to_string()),
            is_active: Set(true),
            is_admin: Set(is_admin),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed user")
    }

    pub async fn seed_room(&self, code: &str, name: &str) -> room::Model {
        room::ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            qr_code: Set(format!("QR-{}", code)),
            is_active: Set(true),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed room")
    }

    pub async fn grant(&self, user_id: i32, room_id: i32) -> permission::Model {
        permission::ActiveModel {
            user_id: Set(user_id),
            room_id: Set(room_id),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed permission")
    }

    /// A user with access to a room, already logged in there.
    pub async fn session(&self, user_code: &str, role: Role, is_admin: bool, room: &room::Model) -> String {
        let u = self.seed_user(user_code, user_code, role, is_admin).await;
        self.grant(u.id, room.id).await;
        self.login(user_code, &room.code).await
    }

    /// One cabinet with one shelf of `shelf_capacity` in `room_id`.
    pub async fn seed_shelf(&self, room_id: i32, code: &str, shelf_capacity: i32) -> shelf::Model {
        let now = Utc::now().naive_utc();
        let cab = cabinet::ActiveModel {
            room_id: Set(room_id),
            code: Set(format!("D-{}", code)),
            name: Set(format!("Dolap {}", code)),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed cabinet");

        shelf::ActiveModel {
            cabinet_id: Set(cab.id),
            code: Set(code.to_string()),
            capacity: Set(shelf_capacity),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed shelf")
    }

    pub async fn seed_cell(&self, shelf_id: i32, code: &str, capacity: i32) -> cell::Model {
        cell::ActiveModel {
            shelf_id: Set(shelf_id),
            code: Set(code.to_string()),
            capacity: Set(capacity),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed cell")
    }

    pub async fn seed_customer(&self, code: &str, name: &str) -> customer::Model {
        let now = Utc::now().naive_utc();
        customer::ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed customer")
    }

    pub async fn seed_swatch(
        &self,
        number: &str,
        color_code: &str,
        color_name: &str,
        cell_id: Option<i32>,
    ) -> swatch::Model {
        let now = Utc::now().naive_utc();
        swatch::ActiveModel {
            number: Set(number.to_string()),
            color_code: Set(color_code.to_string()),
            color_name: Set(color_name.to_string()),
            pantone_code: Set(None),
            status: Set(SwatchStatus::Aktif),
            slots_used: Set(0),
            slots_max: Set(4),
            customer_id: Set(None),
            cell_id: Set(cell_id),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed swatch")
    }
}

/// A simplified HTTP response for test assertions.
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Failed to parse response as JSON")
    }

    pub fn is_success(&self) -> bool {
        self.json()["success"].as_bool().unwrap_or(false)
    }

    pub fn data(&self) -> serde_json::Value {
        self.json()["data"].clone()
    }

    pub fn error(&self) -> serde_json::Value {
        self.json()["error"].clone()
    }

    /// The error `code` string, if any.
    pub fn error_code(&self) -> Option<String> {
        self.error()["code"].as_str().map(str::to_string)
    }

    /// Every `Set-Cookie` header value.
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }
}
