use std::time::Duration;

use sea_orm::Database;
use tracing::info;

use fifahub_auth::config::AuthConfig;
use fifahub_auth::infra::crypto::SecretCipher;
use fifahub_auth::router::build_router;
use fifahub_auth::state::AppState;
use fifahub_core::config::Config;
use fifahub_core::rate_limit::RateLimiter;
use fifahub_core::tracing::init_tracing;

/// How often closed rate-limit windows are dropped from memory.
const RATE_LIMIT_PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() {
    init_tracing("info,sqlx=warn");

    let config = AuthConfig::from_env().expect("invalid auth configuration");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let limiter = RateLimiter::new();
    {
        let limiter = limiter.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(RATE_LIMIT_PURGE_INTERVAL);
            loop {
                tick.tick().await;
                limiter.purge_expired();
            }
        });
    }

    let state = AppState {
        db,
        redis,
        cipher: SecretCipher::from_secret(config.encryption_secret()),
        limiter,
        policy: config.two_factor_policy(),
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
        issuer: config.two_factor_issuer,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
