use sea_orm::Database;
use tracing::info;

use fifahub_core::config::Config;
use fifahub_core::tracing::init_tracing;
use fifahub_datasets::config::DatasetsConfig;
use fifahub_datasets::domain::types::RecommendationWeights;
use fifahub_datasets::router::build_router;
use fifahub_datasets::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing("info,sqlx=warn");

    let config = DatasetsConfig::from_env().expect("invalid datasets configuration");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        weights: RecommendationWeights::default(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.datasets_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("datasets service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
