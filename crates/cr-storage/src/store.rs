//! Read-through rating cache

use cr_core::{ContentRef, RatingCode, UnitId, UnitResolver};
use dashmap::DashMap;

use crate::{RatingBackend, Result, StorageError};

/// Cache-aside store for unit ratings.
///
/// Reads populate the cache, negative results included. Writes go straight
/// to the backend and then replace the cache entry, so a read that follows a
/// write in the same process always sees it. Entries live until
/// [`RatingStore::invalidate`] or [`RatingStore::clear_cache`].
pub struct RatingStore<B> {
    backend: B,
    /// Map from unit -> rating (`None` = known unrated)
    cache: DashMap<UnitId, Option<RatingCode>>,
}

impl<B: RatingBackend> RatingStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: DashMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Strict read: backend failures surface as errors.
    ///
    /// Invalid unit ids are `Ok(None)`.
    pub async fn try_get_rating(&self, unit: UnitId) -> Result<Option<RatingCode>> {
        if !unit.is_valid() {
            return Ok(None);
        }
        if let Some(hit) = self.cache.get(&unit) {
            tracing::debug!(%unit, "rating cache hit");
            return Ok(hit.value().clone());
        }

        tracing::debug!(%unit, "rating cache miss");
        let rating = self.backend.fetch(unit).await?.and_then(|raw| {
            if raw.trim().is_empty() {
                return None;
            }
            match RatingCode::new(&raw) {
                Ok(code) => Some(code),
                Err(_) => {
                    tracing::warn!(%unit, value = %raw, "ignoring malformed stored rating");
                    None
                }
            }
        });
        // a write that landed while we were fetching wins
        let rating = self.cache.entry(unit).or_insert(rating).value().clone();
        Ok(rating)
    }

    /// Degraded read: backend failures are logged and read as unrated.
    pub async fn get_rating(&self, unit: UnitId) -> Option<RatingCode> {
        match self.try_get_rating(unit).await {
            Ok(rating) => rating,
            Err(e) => {
                tracing::warn!(%unit, error = %e, "rating lookup failed, treating as unrated");
                None
            }
        }
    }

    /// Rating of whatever `content` names; unresolvable references are unrated
    pub async fn get_rating_for(
        &self,
        content: &ContentRef,
        resolver: &dyn UnitResolver,
    ) -> Option<RatingCode> {
        let unit = content.resolve(resolver)?;
        self.get_rating(unit).await
    }

    pub async fn set_rating(&self, unit: UnitId, code: &RatingCode) -> Result<()> {
        if !unit.is_valid() {
            return Err(StorageError::InvalidUnit(unit));
        }
        if let Err(e) = self.backend.upsert(unit, code).await {
            self.cache.remove(&unit);
            return Err(e);
        }
        self.cache.insert(unit, Some(code.clone()));
        Ok(())
    }

    pub async fn clear_rating(&self, unit: UnitId) -> Result<()> {
        if !unit.is_valid() {
            return Err(StorageError::InvalidUnit(unit));
        }
        if let Err(e) = self.backend.delete(unit).await {
            self.cache.remove(&unit);
            return Err(e);
        }
        self.cache.insert(unit, None);
        Ok(())
    }

    /// Set or clear depending on `code`
    pub async fn assign(&self, unit: UnitId, code: Option<&RatingCode>) -> Result<()> {
        match code {
            Some(code) => self.set_rating(unit, code).await,
            None => self.clear_rating(unit).await,
        }
    }

    /// Drop the cached entry for `unit`; the next read goes to the backend
    pub fn invalidate(&self, unit: UnitId) {
        self.cache.remove(&unit);
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
