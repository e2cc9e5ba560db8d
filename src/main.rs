use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use imaginarium::application::ports::Repositories;
use imaginarium::infrastructure::auth::{BcryptPasswordHasher, JwtTokenService};
use imaginarium::infrastructure::observability::{TracingConfig, init_tracing};
use imaginarium::infrastructure::persistence::{
    Database, DatabaseOptions, in_memory_repositories, pg_repositories, run_migrations,
};
use imaginarium::presentation::config::DatabaseBackend;
use imaginarium::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;

    init_tracing(&TracingConfig {
        environment: settings.environment.to_string(),
        json_format: settings.logging.json,
        level: settings.logging.level.clone(),
    });

    let (repositories, database) = build_repositories(&settings).await?;

    let password_hasher = Arc::new(BcryptPasswordHasher::new(settings.auth.bcrypt_cost));
    let token_service = Arc::new(JwtTokenService::new(
        &settings.auth.jwt_secret,
        settings.auth.token_ttl,
    ));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let rate_limit = settings.rate_limit.clone();

    let state = AppState::new(
        repositories,
        password_hasher,
        token_service,
        settings,
        database.clone(),
    );

    if rate_limit.enabled {
        let limiter = state.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(rate_limit.window);
            loop {
                interval.tick().await;
                limiter.purge_stale(rate_limit.window).await;
            }
        });
    }

    let app = create_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("API server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    if let Some(database) = database {
        database.disconnect().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn build_repositories(
    settings: &Settings,
) -> anyhow::Result<(Repositories, Option<Arc<Database>>)> {
    match settings.database.backend {
        DatabaseBackend::Memory => {
            tracing::warn!("Using the in-memory backend; data is lost on restart");
            Ok((in_memory_repositories(), None))
        }
        DatabaseBackend::Postgres => {
            let database = Arc::new(Database::new(DatabaseOptions {
                url: settings.database.url.clone(),
                max_connections: settings.database.max_connections,
                acquire_timeout: settings.database.acquire_timeout,
            }));
            let pool = database
                .connect()
                .await
                .context("Failed to connect to PostgreSQL")?;
            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            Ok((pg_repositories(pool), Some(database)))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
