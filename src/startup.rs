use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serenity::http::Http;
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    data::store::RecordStore,
    error::AppError,
    scheduler::registry::CallbackRegistry,
    service::{bump_reminder, moderation::{expire, gateway::ModerationGateway}},
};

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "info,sqlx=warn,serenity=warn";

/// Installs the global tracing subscriber.
///
/// Reads the filter from `RUST_LOG`, falling back to `DEFAULT_LOG_FILTER`.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then runs all pending SeaORM migrations so the `record` table exists
/// before any task is restored.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Registers every callback a stored task may reference.
///
/// The bump reminder callback is registered even when bump reminders are disabled, so
/// reminders stored while they were enabled still resolve and get cleaned up.
///
/// # Returns
/// - `Ok(CallbackRegistry)` - The populated registry
/// - `Err(AppError::RegistryErr)` - Two callbacks claimed the same name
pub fn build_registry(
    config: &Config,
    store: Arc<dyn RecordStore>,
    http: Arc<Http>,
    gateway: Arc<dyn ModerationGateway>,
) -> Result<CallbackRegistry, AppError> {
    let mut registry = CallbackRegistry::new();

    let ping_roles = config
        .bump
        .as_ref()
        .map(|bump| bump.ping_roles.clone())
        .unwrap_or_default();
    bump_reminder::register(&mut registry, http, ping_roles)?;
    expire::register(&mut registry, store, gateway)?;

    tracing::debug!("Registered {} task callbacks", registry.len());

    Ok(registry)
}
