use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

use todo_service::config::{Config, StoreKind};
use todo_service::routes::tasks::{MemoryTaskStore, PgTaskStore, TaskStore};
use todo_service::state::AppState;
use todo_service::{build_router, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let tasks: Arc<dyn TaskStore> = match config.store {
        StoreKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL missing, it is required")?;
            let db = PgPool::connect(url)
                .await
                .context("Error connecting DB")?;
            sqlx::migrate!("./migrations")
                .run(&db)
                .await
                .context("Error running migrations")?;
            Arc::new(PgTaskStore::new(db))
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory task store, data is lost on exit");
            Arc::new(MemoryTaskStore::new())
        }
    };

    if config.seed_demo_tasks {
        seed::seed_demo_tasks(tasks.as_ref())
            .await
            .context("Error seeding demo tasks")?;
    }

    let app = build_router(AppState::new(tasks));

    let listener = tokio::net::TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("Error binding {}", config.addr()))?;

    tracing::info!(addr = %config.addr(), store = ?config.store, "todo-service listening");

    axum::serve(listener, app).await?;

    Ok(())
}
