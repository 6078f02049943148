//! Filekeep API
//!
//! Thin HTTP surface over the filekeep storage pipeline: multipart
//! uploads, retrieval (plain and transform-on-read), metadata, URL
//! construction and deletion.

pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;

// Re-export commonly used types
pub use setup::routes::build_router;
pub use state::AppState;
