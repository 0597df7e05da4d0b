//! Router assembly and the HTTP server entry point.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{config::AppConfig, errors::Result};

use super::{account, auth, expense, types::ApiResponse};

/// Shared application state.
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Runtime configuration
    pub config: AppConfig,
}

/// Builds the full router over the shared state.
///
/// Layer order matters: the session middleware wraps only the authenticated
/// routes, the maintenance gate wraps everything added before it, and the
/// health route is attached last so it stays reachable during maintenance.
pub fn router(state: Arc<AppState>) -> Router {
    let authenticated = Router::new()
        .route("/api/expense/data", get(expense::get_data))
        .route("/api/expense/config", post(expense::create_config))
        .route("/api/expense/budget", post(expense::create_budget))
        .route("/api/expense", post(expense::add_expense))
        .route("/api/expense/:id", delete(expense::delete_expense))
        .route("/api/expense/reset", post(expense::reset))
        .route("/api/account", delete(account::delete_account))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_session,
        ));

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route(
            "/api/expense/recommendation",
            get(expense::recommendation),
        )
        .merge(authenticated)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            maintenance_gate,
        ))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the HTTP server and runs until the process is stopped.
pub async fn serve(config: AppConfig, db: DatabaseConnection) -> Result<()> {
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState { db, config });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(%bind_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// `GET /api/health` - liveness probe, exempt from maintenance mode.
async fn health() -> Json<ApiResponse<()>> {
    ApiResponse::ok_empty("ok")
}

/// When maintenance mode is on, every gated endpoint answers 503 with the
/// failure envelope. The flag is plain injected configuration; the core
/// never consults it.
async fn maintenance_gate(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if state.config.maintenance_mode {
        let body = ApiResponse::<()> {
            success: false,
            message: "Servicio en mantenimiento".to_string(),
            data: None,
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
    }
    next.run(request).await
}
