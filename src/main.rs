use std::net::SocketAddr;
use std::sync::Arc;

use hr_portal_backend::{
    config::{Config, StorageBackend},
    database::{create_pool, run_migrations},
    repository::{MemoryStore, PgStore, Store},
    routes,
    services::notification_service::{LogSink, NotificationSink, WebhookSink},
    AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,sqlx=warn"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    let store: Arc<dyn Store> = match config.storage {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for postgres storage"))?;
            let pool = create_pool(url).await?;
            run_migrations(&pool).await?;
            info!("Connected to Postgres and applied migrations");
            Arc::new(PgStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let sink: Arc<dyn NotificationSink> = match &config.notification_webhook_url {
        Some(url) => {
            info!(target_url = %url, "Delivering notifications by webhook");
            Arc::new(WebhookSink::new(url.clone(), config.webhook_secret.clone())?)
        }
        None => Arc::new(LogSink),
    };

    let app_state = AppState::new(config.clone(), store, sink);

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        app_state.auth_service.seed_admin(email, password).await?;
    }

    let app = routes::build_router(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
