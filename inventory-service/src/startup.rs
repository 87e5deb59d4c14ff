//! Application startup and lifecycle management.

use crate::config::InventoryConfig;
use crate::handlers::{audit_logs, auth, documents, health, lines, prices, users};
use crate::middleware::metrics_middleware;
use crate::services::{init_metrics, Database};
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::tracing::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: InventoryConfig,
    pub db: Arc<Database>,
}

/// Build the HTTP router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics_handler))
        .route("/auth/login", post(auth::login))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:usercode",
            put(users::update_user).delete(users::delete_user),
        )
        .route("/roles", get(users::list_roles))
        .route("/audit-logs", get(audit_logs::list_audit_logs))
        .route(
            "/incoming-documents",
            get(documents::list_documents).post(documents::create_document),
        )
        .route(
            "/incoming-documents/next-number",
            get(documents::next_number),
        )
        .route(
            "/incoming-documents/number-exists",
            get(documents::number_exists),
        )
        .route(
            "/incoming-documents/:id",
            get(documents::get_document).put(documents::update_document),
        )
        .route(
            "/incoming-documents/by-number/:number",
            get(documents::get_document_by_number),
        )
        .route(
            "/incoming-documents/by-number/:number/lines",
            get(documents::list_document_lines),
        )
        .route(
            "/incoming-documents/by-number/:number/recalculate",
            post(documents::recalculate_document),
        )
        .route("/incoming-document-lines", post(lines::create_line))
        .route(
            "/incoming-document-lines/:id",
            put(lines::update_line).delete(lines::delete_line),
        )
        .route(
            "/products/:product_id/prices",
            get(prices::list_prices).post(prices::create_price),
        )
        .route(
            "/products/:product_id/prices/close",
            post(prices::close_price),
        )
        .route(
            "/product-prices/:id",
            put(prices::update_price).delete(prices::delete_price),
        )
        .route_layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    http_listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: InventoryConfig) -> Result<Self, AppError> {
        Self::build_internal(config, true).await
    }

    /// Build the application without running migrations.
    /// Use this in tests when migrations are already applied by the test harness.
    pub async fn build_without_migrations(config: InventoryConfig) -> Result<Self, AppError> {
        Self::build_internal(config, false).await
    }

    async fn build_internal(config: InventoryConfig, run_migrations: bool) -> Result<Self, AppError> {
        init_metrics();

        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        if run_migrations {
            db.run_migrations().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to run migrations");
                e
            })?;
        }

        let http_addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let http_listener = TcpListener::bind(http_addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %http_addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        tracing::info!(http_port = http_port, "Inventory service listener bound");

        let state = AppState {
            config,
            db: Arc::new(db),
        };

        Ok(Self {
            http_port,
            http_listener,
            state,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &Database {
        &self.state.db
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let app = router(self.state.clone());

        tracing::info!(
            service = %self.state.config.service_name,
            version = %self.state.config.service_version,
            http_port = self.http_port,
            "Service ready to accept connections"
        );

        axum::serve(self.http_listener, app).await.map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            std::io::Error::other(format!("HTTP server error: {}", e))
        })
    }
}
