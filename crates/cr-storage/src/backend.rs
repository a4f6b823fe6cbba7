//! Backend trait for the persistent rating relation

use async_trait::async_trait;
use cr_core::{RatingCode, UnitId};
use dashmap::DashMap;

use crate::{PROPERTY_NAME, PageProp, Result};

/// Persistent unit -> rating relation.
///
/// Implementations hold at most one value per unit; `upsert` overwrites and
/// `delete` removes the row.
#[async_trait]
pub trait RatingBackend: Send + Sync {
    /// Raw stored value for `unit`, if any
    async fn fetch(&self, unit: UnitId) -> Result<Option<String>>;

    async fn upsert(&self, unit: UnitId, code: &RatingCode) -> Result<()>;

    async fn delete(&self, unit: UnitId) -> Result<()>;

    /// All rating rows, ordered by unit
    async fn list(&self) -> Result<Vec<PageProp>>;
}

/// Process-local backend, for hosts without a database and for tests
#[derive(Debug, Default)]
pub struct MemoryBackend {
    rows: DashMap<UnitId, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RatingBackend for MemoryBackend {
    async fn fetch(&self, unit: UnitId) -> Result<Option<String>> {
        Ok(self.rows.get(&unit).map(|v| v.value().clone()))
    }

    async fn upsert(&self, unit: UnitId, code: &RatingCode) -> Result<()> {
        self.rows.insert(unit, code.as_str().to_string());
        Ok(())
    }

    async fn delete(&self, unit: UnitId) -> Result<()> {
        self.rows.remove(&unit);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PageProp>> {
        let mut rows: Vec<PageProp> = self
            .rows
            .iter()
            .map(|entry| PageProp {
                pp_page: entry.key().get(),
                pp_propname: PROPERTY_NAME.to_string(),
                pp_value: entry.value().clone(),
            })
            .collect();
        rows.sort_by_key(|row| row.pp_page);
        Ok(rows)
    }
}

#[async_trait]
impl<B: RatingBackend + ?Sized> RatingBackend for std::sync::Arc<B> {
    async fn fetch(&self, unit: UnitId) -> Result<Option<String>> {
        (**self).fetch(unit).await
    }

    async fn upsert(&self, unit: UnitId, code: &RatingCode) -> Result<()> {
        (**self).upsert(unit, code).await
    }

    async fn delete(&self, unit: UnitId) -> Result<()> {
        (**self).delete(unit).await
    }

    async fn list(&self) -> Result<Vec<PageProp>> {
        (**self).list().await
    }
}
