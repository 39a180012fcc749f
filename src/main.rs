mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod routes;
mod services;
mod state;
mod sync;
mod utils;
mod ws;

use std::panic;
use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use db::{NoteStore, PgNoteStore};
use docs::ApiDoc;
use routes::api::create_api_routes;
use state::AppState;
use sync::{PresenceNotifier, UpdateBroadcaster};
use ws::registry::ChannelRegistry;
use ws::session::websocket_handler;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Default to info level, but allow debug for our app
            "notehub=debug,tower_http=debug,axum::rejection=trace,info".into()
        }))
        .init();

    info!("Starting server...");

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });
    config::init_config(config.clone());

    // The update broadcaster cannot run without its persistence gateway
    let Some(db_url) = &config.db_url else {
        error!("No database URL configured - set DB_URL");
        std::process::exit(1);
    };
    let store = match PgNoteStore::connect(db_url).await {
        Ok(store) => {
            info!("Database initialized successfully");
            Arc::new(store) as Arc<dyn NoteStore>
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    // Wire up the sync layer: one registry per process, shared by handle
    let registry = Arc::new(ChannelRegistry::new());
    let broadcaster = UpdateBroadcaster::new(store, registry.clone());
    let presence = PresenceNotifier::new(registry.clone());
    let app_state = Arc::new(AppState::new(registry, broadcaster, presence));

    // Create API routes
    let api_routes = create_api_routes(app_state.clone());

    // CORS: explicit origins when configured, permissive in development
    let cors_layer = match &config.cors_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    };

    // Combine all routes
    let app_routes = Router::new()
        // Mount API routes
        .nest("/api", api_routes)
        // WebSocket endpoint for the realtime channel protocol
        .route("/ws", get(websocket_handler).with_state(app_state))
        // Mount Swagger UI
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add tracing layer
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer);

    // Start the HTTP/API server
    let listener = tokio::net::TcpListener::bind(config.server_address())
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", config.server_address()));

    info!("🚀 Server running on http://{}", config.server_address());
    info!("📡 WebSocket available at ws://{}/ws", config.server_address());
    info!("📚 Swagger UI available at http://{}/swagger", config.server_address());

    axum::serve(listener, app_routes)
        .await
        .expect("Server failed to start");
}
