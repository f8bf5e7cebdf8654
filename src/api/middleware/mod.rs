pub mod error_handler;
pub mod request_id;
pub mod timing;

pub use error_handler::internal_error_handlers;
pub use request_id::{RequestId, request_id_middleware};
pub use timing::TimingMiddleware;
