//! Filekeep Storage Library
//!
//! This crate provides the content store abstraction and the local
//! filesystem implementation.
//!
//! # Storage layout
//!
//! Bytes are addressed by an optional folder plus a stored filename
//! (`{public_id}.{extension}`). With no folder, files land in the root
//! storage area. Folder and filename components must not contain `..`,
//! backslashes, or a leading `/`; path resolution is centralized in the
//! local backend so the storage root cannot be escaped.

pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalContentStore;
pub use traits::{ContentStore, StorageError, StorageResult};
