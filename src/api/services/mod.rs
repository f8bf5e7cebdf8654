pub mod error;
pub mod health;
pub mod lookup;

pub use error::{ApiError, ErrorResponse};
pub use health::{HealthResponse, HealthService, health_routes};
pub use lookup::{LookupHandler, LookupResponse, lookup_routes};
