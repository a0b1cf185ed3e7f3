pub mod openapi;
pub mod registry_handlers;
pub mod responses;
pub mod routes;
pub mod sync_handlers;

pub use registry_handlers::RegistryState;
pub use routes::create_router;
pub use sync_handlers::JobState;
