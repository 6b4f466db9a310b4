//! # HiveHelper API Server
//!
//! JSON API for beekeepers: accounts and sessions, hives, hive health
//! readings and maintenance tasks.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/hivehelper cargo run -p hivehelper-api
//! ```
//!
//! Without `DATABASE_URL` the server runs on an in-memory store that is lost
//! on restart.

use hivehelper_api::{
    app::{build_router, AppState},
    config::Config,
};
use hivehelper_shared::{
    auth::session::{spawn_session_reaper, MemorySessionStore, SessionStore},
    db::{
        migrations::{ensure_database_exists, get_migration_status, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::{memory::MemoryStore, postgres::PgStore, Store},
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!(
        "HiveHelper API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let (store, pool): (Arc<dyn Store>, Option<PgPool>) = match &config.database {
        Some(database) => {
            if !config.api.production {
                ensure_database_exists(&database.url).await?;
            }

            let pool = create_pool(DatabaseConfig {
                url: database.url.clone(),
                max_connections: database.max_connections,
                ..Default::default()
            })
            .await?;

            run_migrations(&pool).await?;
            let status = get_migration_status(&pool).await?;
            tracing::info!(
                applied = status.applied_migrations,
                latest = ?status.latest_version,
                "Database schema ready"
            );

            (Arc::new(PgStore::new(pool.clone())), Some(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
            (Arc::new(MemoryStore::new()), None)
        }
    };

    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new(config.session.capacity));
    let reaper = spawn_session_reaper(
        sessions.clone(),
        Duration::from_secs(config.session.purge_interval_seconds.max(1)),
    );

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(store.clone(), sessions, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(backend = store.backend(), "Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    reaper.abort();
    if let Some(pool) = pool {
        close_pool(pool).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Plain or JSON log lines, selected by `LOG_FORMAT=json`
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "hivehelper_api=debug,hivehelper_shared=info,tower_http=debug".into()
    });

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
