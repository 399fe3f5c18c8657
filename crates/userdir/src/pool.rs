//! Connection pool utilities

use crate::config::DatabaseConfig;
use crate::error::{DirectoryError, DirectoryResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Create a connection pool from the `[database]` section.
///
/// Uses `NoTls`; the pool connects lazily, so an unreachable server surfaces
/// on the first checkout rather than here.
pub fn create_pool(config: &DatabaseConfig) -> DirectoryResult<Pool> {
    let pg_config: tokio_postgres::Config = config
        .url
        .parse()
        .map_err(|e: tokio_postgres::Error| DirectoryError::Connection(e.to_string()))?;

    let mgr = Manager::from_config(pg_config, NoTls, default_manager_config());
    Pool::builder(mgr)
        .max_size(config.max_pool_size)
        .build()
        .map_err(|e| DirectoryError::Pool(e.to_string()))
}

fn default_manager_config() -> ManagerConfig {
    ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    }
}
