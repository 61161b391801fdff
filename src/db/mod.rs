use crate::config::AppConfig;
use crate::errors::Result;
use crate::types::ApiError;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use rocket::tokio::task;
use std::time::Duration;
use tracing::error;

pub mod schema;

// An alias to the type for a pool of Diesel Postgres connections.
pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

/// Builds the pool and opens its initial connections, failing if the
/// database is unreachable.
pub fn init_pool(config: &AppConfig) -> Result<Pool> {
    let manager = ConnectionManager::<PgConnection>::new(config.database_url.as_str());
    let pool = Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(config.connect_timeout)
        .build(manager)?;
    Ok(pool)
}

/// Builds a pool that connects on first checkout. Nothing is dialed until a
/// handler asks for a connection.
pub fn lazy_pool(database_url: &str, connect_timeout: Duration) -> Pool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .connection_timeout(connect_timeout)
        .build_unchecked(manager)
}

/// Runs `f` with a pooled connection on the runtime's blocking thread pool.
/// All queries issued by `f` share that one connection.
pub async fn run<F, T>(pool: &Pool, f: F) -> ::std::result::Result<T, ApiError>
where
    F: FnOnce(&mut PgConnection) -> ::std::result::Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    task::spawn_blocking(move || -> ::std::result::Result<T, ApiError> {
        let mut connection: DbConnection = pool.get()?;
        f(&mut *connection)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "blocking database task failed");
        ApiError::Internal
    })?
}
