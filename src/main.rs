use axum::{
    extract::{State, WebSocketUpgrade},
    http::Method,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod game;
mod lobby;
mod protocol;
mod room_runtime;
mod shared;
mod transport;

use config::ServerConfig;
use lobby::{Lobby, LobbyStats};

#[derive(Clone)]
struct AppState {
    lobby: Arc<Lobby>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    ok: bool,
    #[serde(flatten)]
    stats: LobbyStats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(?config, "starting snake arena");

    let state = AppState {
        lobby: Arc::new(Lobby::new()),
    };

    tokio::spawn(room_runtime::scheduler::run_scheduler(
        Arc::clone(&state.lobby),
        config.clone(),
    ));
    if config.mean_comments {
        tokio::spawn(room_runtime::heckler::run_heckler(Arc::clone(&state.lobby)));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/ws", get(ws_handler))
        .layer(cors)
        .with_state(state);

    let address = format!("0.0.0.0:{}", config.port);
    tracing::info!("listening on {address}");

    let listener = tokio::net::TcpListener::bind(&address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        stats: state.lobby.stats(),
    })
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| transport::ws_session::handle_socket(socket, state.lobby))
}
