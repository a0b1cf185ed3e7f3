/// Database module for the instrument registry
///
/// This module provides:
/// - PostgreSQL connection pooling
/// - Repository pattern implementations over companies and tickers
/// - Database models and schema
/// - Diesel ORM integration

pub mod connection;
pub mod enums;
pub mod models;
pub mod repositories;
pub mod schema;

pub use connection::{establish_connection_pool, DatabaseError, RegistryPool};
