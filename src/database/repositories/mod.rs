/// Repository pattern implementations for the instrument registry
///
/// Traits define the registry contract; diesel-backed impls live behind a
/// connection-provider closure so callers depend on the trait, not the pool.

pub mod company_repository;
pub mod ticker_repository;

pub use company_repository::{CompanyRepository, CompanyRepositoryImpl};
pub use ticker_repository::{TickerRepository, TickerRepositoryImpl};
