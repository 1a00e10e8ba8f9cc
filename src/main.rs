use coachlens::{
    benchmark::repository::{InMemoryDistributionRepository, PostgresDistributionRepository},
    ingest::repository::InMemoryProfileRepository,
    router, AppConfig, AppState, DistributionRepository, InMemoryMatchSource, MatchSource,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coachlens=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    info!(bind_addr = %config.bind_addr, "Starting coachlens server");

    let match_source: Arc<dyn MatchSource> = match &config.match_data {
        Some(path) => Arc::new(InMemoryMatchSource::from_catalog_file(path).await?),
        None => {
            warn!("COACHLENS_MATCH_DATA not set, serving an empty match catalog");
            Arc::new(InMemoryMatchSource::new())
        }
    };

    let distribution_repository: Arc<dyn DistributionRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            sqlx::migrate!().run(&pool).await?;
            info!("Using PostgreSQL distribution repository");
            Arc::new(PostgresDistributionRepository::new(pool))
        }
        None => {
            info!("DATABASE_URL not set, keeping distributions in memory");
            Arc::new(InMemoryDistributionRepository::new())
        }
    };

    let bind_addr = config.bind_addr.clone();
    let app_state = AppState::new(
        Arc::new(InMemoryProfileRepository::new()),
        distribution_repository,
        match_source,
        config,
    );

    let app = router(app_state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server running on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
