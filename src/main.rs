use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use wholesale_rpc::seed::SeedData;
use wholesale_rpc::session::{demo_users, MemorySessions};
use wholesale_rpc::store::schema;
use wholesale_rpc::{
    app, telemetry, AppState, Config, MemoryStore, PgStore, Repositories, RpcRouter,
};

async fn repositories(config: &Config) -> Result<Repositories, Box<dyn std::error::Error>> {
    let Some(url) = &config.database_url else {
        info!("DATABASE_URL not set, serving seeded in-memory data");
        return Ok(Repositories::from_store(Arc::new(MemoryStore::seeded())));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(url)
        .await?;
    schema::migrate(&pool).await?;
    if config.seed_database {
        schema::seed(&pool, &SeedData::mock()).await?;
    }
    info!(max_connections = config.max_connections, "connected to postgres");
    Ok(Repositories::from_store(Arc::new(PgStore::new(pool))))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    let config = Config::from_env()?;
    let repos = repositories(&config).await?;

    let sessions = Arc::new(MemorySessions::new());
    for user in demo_users() {
        let (name, role) = (user.name.clone(), user.role);
        let token = sessions.issue(user);
        let cookie = config.cookies.set_cookie(&token);
        info!(%name, %role, %cookie, "demo session issued");
    }

    let router = RpcRouter::new(repos, sessions);
    let state = AppState::new(router, config.cookies.clone());

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
