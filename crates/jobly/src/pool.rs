//! Connection pool utilities

use crate::config::Config;
use crate::error::{JoblyError, JoblyResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Create a connection pool from the application config.
///
/// Uses `NoTls`, which suits a local database.
///
/// # Example
///
/// ```ignore
/// let config = jobly::Config::from_env()?;
/// let pool = jobly::create_pool(&config)?;
/// let client = pool.get().await?;
/// ```
pub fn create_pool(config: &Config) -> JoblyResult<Pool> {
    create_pool_with_size(&config.database_url, config.pool_max_size)
}

/// Create a connection pool from a database URL and a max size.
pub fn create_pool_with_size(database_url: &str, max_size: usize) -> JoblyResult<Pool> {
    let pg_config: tokio_postgres::Config = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| JoblyError::Connection(e.to_string()))?;

    let mgr = Manager::from_config(pg_config, NoTls, default_manager_config());
    let pool = Pool::builder(mgr)
        .max_size(max_size)
        .build()
        .map_err(|e| JoblyError::Pool(e.to_string()))?;

    tracing::info!(target: "jobly.pool", max_size, "connection pool created");
    Ok(pool)
}

fn default_manager_config() -> ManagerConfig {
    ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    }
}
