//! Connection pool helpers

use crate::error::{QueryError, QueryResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Default maximum number of pooled connections.
pub const DEFAULT_MAX_SIZE: usize = 16;

/// Create a `NoTls` pool from a database URL with [`DEFAULT_MAX_SIZE`].
///
/// ```ignore
/// let pool = predql::create_pool(&std::env::var("DATABASE_URL")?)?;
/// let client = pool.get().await?;
/// let rows = query.execute(&client).await?;
/// ```
pub fn create_pool(database_url: &str) -> QueryResult<Pool> {
    create_pool_with_config(database_url, DEFAULT_MAX_SIZE)
}

/// Create a `NoTls` pool holding at most `max_size` connections.
pub fn create_pool_with_config(database_url: &str, max_size: usize) -> QueryResult<Pool> {
    let pg_config: tokio_postgres::Config = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| QueryError::Connection(e.to_string()))?;

    let manager = Manager::from_config(
        pg_config,
        NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );
    Pool::builder(manager)
        .max_size(max_size)
        .build()
        .map_err(|e| QueryError::Pool(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_url_is_a_connection_error() {
        let err = create_pool("not a url ::").unwrap_err();
        assert!(matches!(err, QueryError::Connection(_)));
    }
}
