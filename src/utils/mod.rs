pub mod ip;

pub use ip::{extract_client_hint, is_private_or_local};
