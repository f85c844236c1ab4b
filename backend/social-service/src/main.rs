use std::time::Duration;

use actix_middleware::JwtAuthMiddleware;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movie_social_service::config::{Config, StorageBackend};
use movie_social_service::handlers;
use movie_social_service::services::CatalogClient;
use movie_social_service::state::AppState;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,movie_social_service=debug".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn build_state(config: &Config) -> Result<AppState> {
    let catalog = CatalogClient::from_config(&config.catalog);
    if catalog.is_none() {
        warn!("TMDB_API_KEY not set; catalog endpoints will answer 503");
    }

    match config.storage {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on restart");
            Ok(AppState::in_memory(catalog))
        }
        StorageBackend::Postgres => {
            let database = config
                .database
                .as_ref()
                .context("DATABASE_URL is required for the postgres backend")?;

            let pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .min_connections(database.min_connections)
                .acquire_timeout(Duration::from_secs(10))
                .idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(1800))
                .connect(&database.url)
                .await
                .context("Failed to connect to database")?;

            sqlx::query("SELECT 1")
                .execute(&pool)
                .await
                .context("Failed to verify database connection")?;
            info!("Database pool created and verified");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            info!("Database migrations completed");

            Ok(AppState::postgres(pool, catalog))
        }
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    info!("Starting movie-social-service");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        env = %config.app.env,
        http_port = config.app.http_port,
        storage = ?config.storage,
        "Configuration loaded"
    );

    let state = web::Data::new(build_state(&config).await?);
    let auth = JwtAuthMiddleware::new(&config.auth.jwt_secret);
    let bind_addr = (config.app.host.clone(), config.app.http_port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(auth.clone())
            .wrap(TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(bind_addr)
    .context("Failed to bind HTTP server")?
    .disable_signals()
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, draining connections");
        handle.stop(true).await;
    });

    info!(
        "HTTP server listening on {}:{}",
        config.app.host, config.app.http_port
    );
    server.await.context("HTTP server error")?;

    info!("movie-social-service stopped");
    Ok(())
}
