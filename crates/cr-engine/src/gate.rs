//! Media gate
//!
//! Decides per file whether a viewer may see it, for the places a host
//! shows media outside of marked-up text: the file page itself, galleries,
//! generated lists and automatic thumbnail selection.

use cr_config::MediaConfig;
use cr_core::{ContentRef, RatingCode, UnitId, UnitResolver, Viewer};
use cr_storage::{RatingBackend, RatingStore, Result};

/// What to show on a single-file display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageDisplay {
    Original,
    /// Show this placeholder file instead
    Placeholder(String),
}

pub struct MediaGate<'a, B> {
    store: &'a RatingStore<B>,
    media: &'a MediaConfig,
    strict: bool,
}

/// Unrated content is always allowed; rated content only when the viewer
/// opted in to that code.
pub fn allows_rating(rating: Option<&RatingCode>, viewer: &Viewer) -> bool {
    match rating {
        None => true,
        Some(code) => viewer.allows(code),
    }
}

impl<'a, B: RatingBackend> MediaGate<'a, B> {
    pub fn new(store: &'a RatingStore<B>, media: &'a MediaConfig, strict: bool) -> Self {
        Self {
            store,
            media,
            strict,
        }
    }

    async fn rating(&self, unit: UnitId) -> Result<Option<RatingCode>> {
        if self.strict {
            self.store.try_get_rating(unit).await
        } else {
            Ok(self.store.get_rating(unit).await)
        }
    }

    pub async fn is_allowed(&self, unit: UnitId, viewer: &Viewer) -> Result<bool> {
        let rating = self.rating(unit).await?;
        Ok(allows_rating(rating.as_ref(), viewer))
    }

    /// Like [`Self::is_allowed`] for a reference that still needs resolving;
    /// unresolvable references are allowed.
    pub async fn is_allowed_ref(
        &self,
        content: &ContentRef,
        resolver: &dyn UnitResolver,
        viewer: &Viewer,
    ) -> Result<bool> {
        match content.resolve(resolver) {
            Some(unit) => self.is_allowed(unit, viewer).await,
            None => Ok(true),
        }
    }

    /// File page display: the original, or the configured warning image
    pub async fn display_image(&self, unit: UnitId, viewer: &Viewer) -> Result<ImageDisplay> {
        if self.is_allowed(unit, viewer).await? {
            Ok(ImageDisplay::Original)
        } else {
            tracing::debug!(%unit, "substituting warning image");
            Ok(ImageDisplay::Placeholder(self.media.warning_image.clone()))
        }
    }

    /// Drop gallery or list entries the viewer may not see, keeping order.
    ///
    /// `unit_of` maps an entry to its unit; entries without one are kept.
    pub async fn retain_allowed<T, F>(
        &self,
        entries: Vec<T>,
        viewer: &Viewer,
        unit_of: F,
    ) -> Result<Vec<T>>
    where
        F: Fn(&T) -> Option<UnitId>,
    {
        let mut kept = Vec::with_capacity(entries.len());
        for entry in entries {
            let allowed = match unit_of(&entry) {
                Some(unit) => self.is_allowed(unit, viewer).await?,
                None => true,
            };
            if allowed {
                kept.push(entry);
            }
        }
        Ok(kept)
    }

    /// Adjust a thumbnail candidate's score; disallowed files are pushed far
    /// down rather than excluded.
    pub async fn score_candidate(&self, unit: UnitId, score: f64, viewer: &Viewer) -> Result<f64> {
        if self.is_allowed(unit, viewer).await? {
            Ok(score)
        } else {
            Ok(score - self.media.thumbnail_penalty)
        }
    }

    /// Highest scoring candidate after penalties; first one wins ties
    pub async fn pick_thumbnail(
        &self,
        candidates: &[(UnitId, f64)],
        viewer: &Viewer,
    ) -> Result<Option<UnitId>> {
        let mut best: Option<(UnitId, f64)> = None;
        for &(unit, score) in candidates {
            let score = self.score_candidate(unit, score, viewer).await?;
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((unit, score));
            }
        }
        Ok(best.map(|(unit, _)| unit))
    }
}
