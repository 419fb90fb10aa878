use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

mod domain;
mod error;
mod rest;
mod seed;
mod storage;

use domain::{CategoryService, HabitService, ProgressService, StackService};
use rest::AppState;
use storage::json::JsonConnection;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let data_dir =
        std::env::var("HABITSTACK_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    info!("Opening document store at {}", data_dir);
    let connection = Arc::new(JsonConnection::new(&data_dir)?);

    let habit_service = HabitService::new(connection.clone());
    let category_service = CategoryService::new(connection.clone());
    let progress_service = ProgressService::new(connection.clone());
    let stack_service = StackService::new(connection, progress_service.clone());

    seed::seed_default_data(
        &category_service,
        &habit_service,
        &stack_service,
        &progress_service,
    )?;

    let state = AppState::new(
        habit_service,
        category_service,
        stack_service,
        progress_service,
    );

    // CORS setup to allow the frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = rest::api_router(state).layer(cors);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
