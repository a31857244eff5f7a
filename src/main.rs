use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use watchparty::room::registry::InMemoryRoomRegistry;
use watchparty::shared::AppState;
use watchparty::websockets::{router, HeartbeatConfig, InMemoryConnectionRegistry};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watchparty=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting watchparty relay");

    // Registries are owned here and injected, never ambient
    let connections = Arc::new(InMemoryConnectionRegistry::new());
    let rooms = Arc::new(InMemoryRoomRegistry::new());
    let app_state = AppState::new(connections, rooms, HeartbeatConfig::default());

    // Browsers are served from anywhere, so CORS stays permissive
    let app = router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:4000").await.unwrap();
    info!("Relay running on http://localhost:4000");
    axum::serve(listener, app).await.unwrap();
}
