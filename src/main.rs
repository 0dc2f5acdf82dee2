// src/main.rs

use edu_server::config::{Config, StoreBackend};
use edu_server::routes;
use edu_server::state::AppState;
use edu_server::store::{Database, DocumentStore, MemoryDocumentStore, PgDocumentStore};
use edu_server::utils::schema::TemplateRegistry;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CONNECT_RETRIES: u32 = 5;

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "server.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let templates = match TemplateRegistry::load(&config.templates_dir) {
        Ok(templates) => templates,
        Err(e) => {
            tracing::error!("Failed to load schema templates: {}", e);
            process::exit(1);
        }
    };
    tracing::info!(dir = %config.templates_dir.display(), "Schema templates loaded.");

    let store: Arc<dyn DocumentStore> = match config.database.backend {
        StoreBackend::Postgres => match connect_postgres(&config).await {
            Some(store) => Arc::new(store),
            None => process::exit(1),
        },
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; nothing survives a restart.");
            Arc::new(MemoryDocumentStore::default())
        }
    };

    let db = Database::new(store, config.database.name.clone());
    let state = AppState::new(db, templates, config.clone());

    let app = routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            process::exit(1);
        }
    };
    tracing::info!("Listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        process::exit(1);
    }
}

/// Connects with retry, then applies migrations. `None` means startup must abort.
async fn connect_postgres(config: &Config) -> Option<PgDocumentStore> {
    let Some(url) = config.database.url.as_deref() else {
        tracing::error!("No database URL configured for the postgres backend.");
        return None;
    };

    let mut retry_count = 0;
    let pool: PgPool = loop {
        match PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > CONNECT_RETRIES {
                    tracing::error!(
                        "Failed to connect to database after {} retries: {}",
                        CONNECT_RETRIES,
                        e
                    );
                    return None;
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };
    tracing::info!("Database connected...");

    let store = PgDocumentStore::new(pool);
    tracing::info!("Running migrations...");
    if let Err(e) = store.migrate().await {
        tracing::error!("Failed to run database migrations: {}", e);
        return None;
    }
    tracing::info!("Migrations applied successfully.");

    Some(store)
}
