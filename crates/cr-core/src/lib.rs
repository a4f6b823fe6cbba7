//! Core domain models for content rating
//!
//! This crate contains:
//! - Rating codes and the alias table used to classify free text
//! - Content unit identity and reference resolution
//! - Viewer permissions

pub mod alias;
pub mod content;
pub mod error;
pub mod rating;
pub mod viewer;

pub use alias::{AliasTable, Classifier, DEFAULT_RATINGS};
pub use content::{ContentRef, FileHandle, UnitId, UnitResolver};
pub use error::{Error, Result};
pub use rating::RatingCode;
pub use viewer::{PreferenceDescriptor, Viewer, ViewerPermissions, preference_descriptors};
