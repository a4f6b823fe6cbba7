//! Content unit identity
//!
//! Resolving titles and files to a stable identity is the host's job; this
//! module only defines the shapes a lookup may arrive in and the single
//! function that turns any of them into a [`UnitId`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable integer identity of a page or media file.
///
/// Zero and negative values never identify a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub i64);

impl UnitId {
    pub fn new(id: i64) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(self) -> i64 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a media file as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHandle {
    /// Title of the file description page
    pub title: String,
    /// Identity of the description page, if the host already knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitId>,
}

impl FileHandle {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }
}

/// Any of the forms a rating lookup may be keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ContentRef {
    Unit(UnitId),
    Title(String),
    File(FileHandle),
}

impl From<UnitId> for ContentRef {
    fn from(id: UnitId) -> Self {
        ContentRef::Unit(id)
    }
}

impl From<FileHandle> for ContentRef {
    fn from(file: FileHandle) -> Self {
        ContentRef::File(file)
    }
}

/// Host-provided title lookup
pub trait UnitResolver: Send + Sync {
    /// Resolve a page or file title to its identity, `None` if it doesn't exist
    fn resolve_title(&self, title: &str) -> Option<UnitId>;
}

impl ContentRef {
    /// Resolve to a valid unit identity, or `None` when the reference
    /// doesn't name an existing unit.
    pub fn resolve(&self, resolver: &dyn UnitResolver) -> Option<UnitId> {
        let id = match self {
            ContentRef::Unit(id) => Some(*id),
            ContentRef::File(file) => file.unit.or_else(|| resolver.resolve_title(&file.title)),
            ContentRef::Title(text) => {
                let text = text.trim();
                if text.is_empty() {
                    None
                } else {
                    resolver.resolve_title(text)
                }
            }
        };
        id.filter(|id| id.is_valid())
    }
}
