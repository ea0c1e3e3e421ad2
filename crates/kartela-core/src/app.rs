use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::auth::session;
use crate::config::Config;
use crate::controllers::AppState;
use crate::migrations::Migrator;
use crate::openapi::ApiDoc;
use crate::routing;

/// Where the Scalar UI is served; the raw document lives at `{path}/openapi.json`.
pub const API_DOCS_PATH: &str = "/api-docs";

/// How often expired sessions and stale rate-limit entries are pruned.
const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(300);

/// The Kartela application: configuration, database and shared state.
pub struct App {
    pub config: Config,
    pub db: DatabaseConnection,
    state: AppState,
}

impl App {
    /// Load configuration from the environment, connect and migrate.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::from_env()?;
        Self::with_config(config).await
    }

    /// Connect with the given config and run pending migrations.
    pub async fn with_config(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let app = Self::connect(config).await?;
        app.migrate().await?;
        Ok(app)
    }

    /// Connect without touching the schema.
    pub async fn connect(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        config.check()?;
        let db = crate::db::connect(&config).await?;
        let state = AppState::new(db.clone(), config.clone());
        Ok(App { config, db, state })
    }

    /// Apply every pending migration.
    pub async fn migrate(&self) -> Result<(), sea_orm::DbErr> {
        tracing::info!("Running pending database migrations...");
        Migrator::up(&self.db, None).await?;
        tracing::info!("Migrations complete.");
        Ok(())
    }

    /// Roll back the last `steps` migrations.
    pub async fn rollback(&self, steps: u32) -> Result<(), sea_orm::DbErr> {
        tracing::info!(steps, "Rolling back migrations...");
        Migrator::down(&self.db, Some(steps)).await?;
        tracing::info!("Rollback complete.");
        Ok(())
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the full router: API routes, docs, CORS and (in development)
    /// request tracing.
    pub fn router(&self) -> Router {
        let state = self.state();
        let openapi_spec = ApiDoc::openapi();
        let json_spec = openapi_spec.clone();
        let json_path = format!("{}/openapi.json", API_DOCS_PATH);

        let mut router = Router::new()
            .merge(routing::build_routes(state.clone()).with_state(state))
            .merge(Scalar::with_url(API_DOCS_PATH, openapi_spec))
            .route(
                &json_path,
                get(move || {
                    let spec = json_spec.clone();
                    async move { axum::Json(spec) }
                }),
            )
            .layer(CorsLayer::permissive());

        // Only add tracing/request-id middleware in development mode.
        if self.config.is_dev() {
            use tower_http::LatencyUnit;
            use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse};

            let x_request_id = axum::http::HeaderName::from_static("x-request-id");
            router = router
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(PropagateRequestIdLayer::new(x_request_id))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                        .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                        .on_response(
                            DefaultOnResponse::new()
                                .level(tracing::Level::INFO)
                                .latency_unit(LatencyUnit::Millis),
                        ),
                );
        }

        router
    }

    /// Serve until CTRL+C.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.config.server_addr();
        let router = self.router();
        let maintenance = tokio::spawn(maintenance_loop(self.state()));

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!(
            addr = %addr,
            docs = %format!("http://{}{}", addr, API_DOCS_PATH),
            environment = %self.config.environment,
            "Kartela server running"
        );

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        maintenance.abort();
        Ok(())
    }
}

/// Prune expired session rows and idle rate-limit entries.
pub async fn run_maintenance(state: &AppState) {
    state.badge_limiter.cleanup();
    match session::purge_expired(&state.db).await {
        Ok(0) => {}
        Ok(purged) => tracing::info!(purged, "expired room sessions purged"),
        Err(e) => tracing::warn!(error = %e, "session purge failed"),
    }
}

async fn maintenance_loop(state: AppState) {
    let mut interval = tokio::time::interval(MAINTENANCE_INTERVAL);
    loop {
        interval.tick().await;
        run_maintenance(&state).await;
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down Kartela server...");
}
