use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::application::ports::RepositoryError;

const CONNECT_RETRIES: u32 = 5;
const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

#[derive(Debug, Clone)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected(PgPool),
    Failed(String),
}

/// Pool-free view of `ConnectionState`, suitable for health reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Failed => "failed",
        }
    }
}

/// Owns the process-wide Postgres pool. Created once at startup and handed to
/// the repositories; `connect` is idempotent.
pub struct Database {
    options: DatabaseOptions,
    state: Mutex<ConnectionState>,
}

impl Database {
    pub fn new(options: DatabaseOptions) -> Self {
        Self {
            options,
            state: Mutex::new(ConnectionState::Disconnected),
        }
    }

    #[instrument(skip(self), fields(max_connections = self.options.max_connections))]
    pub async fn connect(&self) -> Result<PgPool, RepositoryError> {
        let mut state = self.state.lock().await;
        if let ConnectionState::Connected(pool) = &*state {
            if !pool.is_closed() {
                return Ok(pool.clone());
            }
        }

        *state = ConnectionState::Connecting;
        match create_pool(&self.options).await {
            Ok(pool) => {
                *state = ConnectionState::Connected(pool.clone());
                Ok(pool)
            }
            Err(e) => {
                *state = ConnectionState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        // The lock is only held for the duration of a connect attempt.
        let Ok(state) = self.state.try_lock() else {
            return ConnectionStatus::Connecting;
        };

        match &*state {
            ConnectionState::Disconnected => ConnectionStatus::Disconnected,
            ConnectionState::Connecting => ConnectionStatus::Connecting,
            ConnectionState::Connected(pool) if pool.is_closed() => ConnectionStatus::Disconnected,
            ConnectionState::Connected(_) => ConnectionStatus::Connected,
            ConnectionState::Failed(_) => ConnectionStatus::Failed,
        }
    }

    pub async fn disconnect(&self) {
        let mut state = self.state.lock().await;
        if let ConnectionState::Connected(pool) = &*state {
            pool.close().await;
            info!("PostgreSQL connection pool closed");
        }
        *state = ConnectionState::Disconnected;
    }
}

#[instrument(skip(options))]
async fn create_pool(options: &DatabaseOptions) -> Result<PgPool, RepositoryError> {
    let mut retries = CONNECT_RETRIES;
    let mut delay = INITIAL_RETRY_DELAY;

    loop {
        match PgPoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect(&options.url)
            .await
        {
            Ok(pool) => {
                info!("PostgreSQL connection pool established");
                return Ok(pool);
            }
            Err(e) if retries > 0 => {
                retries -= 1;
                warn!(
                    error = %e,
                    retries_left = retries,
                    delay_ms = delay.as_millis(),
                    "PostgreSQL connection failed, retrying"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(e) => {
                return Err(RepositoryError::ConnectionFailed(e.to_string()));
            }
        }
    }
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(format!("migration failed: {}", e)))?;
    info!("Database migrations applied");
    Ok(())
}
