use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::infra::repositories::{
    postgres_inventory_repo::PostgresInventoryRepo, postgres_job_repo::PostgresJobRepo,
    postgres_report_repo::PostgresReportRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_inventory_repo::SqliteInventoryRepo, sqlite_job_repo::SqliteJobRepo,
    sqlite_report_repo::SqliteReportRepo, sqlite_user_repo::SqliteUserRepo,
};

pub fn is_postgres_url(database_url: &str) -> bool {
    database_url.starts_with("postgres://") || database_url.starts_with("postgresql://")
}

/// Connects to the configured store, applies migrations, seeds the default
/// admin and wires the application state.
pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    let state = if is_postgres_url(database_url) {
        info!("Initializing PostgreSQL connection...");

        let opts: PgConnectOptions = database_url.parse()?;
        let opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        run_postgres_migrations(&pool).await?;
        postgres_state(config.clone(), pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let pool = connect_sqlite(database_url).await?;
        run_sqlite_migrations(&pool).await?;
        sqlite_state(config.clone(), pool)
    };

    state.user_service.ensure_admin(&config.default_admin_username).await?;
    Ok(state)
}

pub async fn connect_sqlite(database_url: &str) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .map_err(AppError::Database)
}

pub fn sqlite_state(config: Config, pool: SqlitePool) -> AppState {
    AppState::new(
        config,
        Arc::new(SqliteUserRepo::new(pool.clone())),
        Arc::new(SqliteJobRepo::new(pool.clone())),
        Arc::new(SqliteInventoryRepo::new(pool.clone())),
        Arc::new(SqliteReportRepo::new(pool)),
    )
}

pub fn postgres_state(config: Config, pool: PgPool) -> AppState {
    AppState::new(
        config,
        Arc::new(PostgresUserRepo::new(pool.clone())),
        Arc::new(PostgresJobRepo::new(pool.clone())),
        Arc::new(PostgresInventoryRepo::new(pool.clone())),
        Arc::new(PostgresReportRepo::new(pool)),
    )
}

pub async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to run Postgres migrations: {e}")))
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to run SQLite migrations: {e}")))
}
