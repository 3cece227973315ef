//! HTTP transport for the skill-shuffle service
//!
//! Game servers post form-encoded shuffle and player requests; monitoring
//! endpoints share the same router.

pub mod handlers;
pub mod server;

pub use handlers::{PlayerForm, ShuffleForm};
pub use server::{create_router, ServerConfig, ShuffleServer};
