use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use my_calendar_server::auth::{IdentityToolkitProvider, SessionRegistry};
use my_calendar_server::config::{Config, StoreBackend};
use my_calendar_server::routes::{create_routes, RouteOptions};
use my_calendar_server::services::EventService;
use my_calendar_server::state::AppState;
use my_calendar_server::store::{EventStore, MemoryEventStore, PgEventStore};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("my_calendar_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();

    let store: Arc<dyn EventStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let store = PgEventStore::connect(&config.database_url, config.max_connections)
                .await
                .expect("Failed to connect to database");
            store.migrate().await.expect("Failed to run migrations");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory event store, events are lost on restart");
            Arc::new(MemoryEventStore::new())
        }
    };

    let identity = IdentityToolkitProvider::new(&config.identity_base_url, &config.identity_api_key)
        .expect("Failed to build identity provider client");

    let events = EventService::new(
        store,
        config.locale,
        config.read_failure,
        config.end_before_start,
    );
    let sessions = SessionRegistry::with_ttl(chrono::Duration::hours(config.session_ttl_hours));
    let state = AppState::new(events, Arc::new(identity)).with_sessions(sessions);
    let options = RouteOptions {
        cors_allowed_origins: config.cors_allowed_origins.clone(),
        production: config.production,
    };
    let app = create_routes(state, &options);

    tracing::info!("🚀 Server running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
