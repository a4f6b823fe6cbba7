//! Storage layer for content ratings
//!
//! This crate provides:
//! - The [`RatingBackend`] seam over the persistent page-property relation
//! - SQLite and in-memory backends
//! - [`RatingStore`], a read-through cache in front of a backend

pub mod backend;
pub mod db;
pub mod error;
pub mod models;
pub mod store;

pub use backend::{MemoryBackend, RatingBackend};
pub use db::SqliteBackend;
pub use error::{Result, StorageError};
pub use models::{PROPERTY_NAME, PageProp};
pub use store::RatingStore;
