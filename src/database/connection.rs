use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager, Pool, PooledConnection};
use std::sync::Arc;
use thiserror::Error;

/// Type alias for PostgreSQL connection pool
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Type alias for pooled connection
pub type PgPooledConnection = PooledConnection<ConnectionManager<PgConnection>>;

/// Container for the instrument registry connection pool
#[derive(Clone)]
pub struct RegistryPool {
    pool: Arc<PgPool>,
}

impl RegistryPool {
    /// Create a registry pool wrapper from an existing pool instance
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Get a connection from the pool
    pub fn get_conn(&self) -> Result<PgPooledConnection, DatabaseError> {
        self.pool
            .get()
            .map_err(|e| DatabaseError::ConnectionPoolError(e.to_string()))
    }
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    ConnectionPoolError(String),

    #[error("Database query error: {0}")]
    QueryError(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Diesel error: {0}")]
    DieselError(#[from] diesel::result::Error),
}

/// Establish the instrument registry connection pool
///
/// # Arguments
/// * `database_url` - PostgreSQL connection URL for the registry database
/// * `pool_size` - Maximum number of connections in the pool
pub fn establish_connection_pool(
    database_url: &str,
    pool_size: u32,
) -> Result<RegistryPool, DatabaseError> {
    tracing::info!("Establishing registry database connection pool...");

    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .max_size(pool_size)
        .build(manager)
        .map_err(|e| DatabaseError::ConnectionPoolError(format!("Registry pool: {}", e)))?;

    tracing::info!("Registry database pool created with max size: {}", pool_size);

    // Test the connection before handing the pool out
    let _ = pool
        .get()
        .map_err(|e| DatabaseError::ConnectionFailed(format!("Registry database: {}", e)))?;

    tracing::info!("Registry database connection successful");

    Ok(RegistryPool::new(pool))
}
