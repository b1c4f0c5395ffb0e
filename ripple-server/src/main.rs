use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ripple_server::api;
use ripple_server::config::Settings;
use ripple_server::db::Database;
use ripple_server::scheduler::SpawnScheduler;
use ripple_server::state::AppState;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ripple_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load settings
    let settings = Settings::new().expect("Failed to load settings");

    // Initialize database
    let db = Database::new(&settings.database.path).expect("Failed to create database");
    db.initialize()
        .expect("Failed to initialize database schema");

    if settings.database.seed_demo_data {
        db.seed_demo_data().expect("Failed to seed demo data");
        tracing::info!("Demo data seeded");
    }
    tracing::info!("Database initialized successfully");

    // Create application state with the in-process task runner
    let scheduler = Arc::new(SpawnScheduler::new(db.clone()));
    let state = AppState::new(db, scheduler, settings.media.clone());

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(state).layer(cors);

    // Start server
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .expect("Failed to parse server address");
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
