use axum::{
    Router,
    routing::{get, put},
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::users;
use crate::db::repo::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
}

impl AppState {
    pub fn new(users: UserStore) -> Self {
        Self { users }
    }
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{username}", put(users::upsert_user))
}

/// Builds the full application. User routes are served both at the root and
/// under `/api`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(user_routes())
        .nest("/api", user_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(addr: &str, state: AppState) -> std::io::Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
