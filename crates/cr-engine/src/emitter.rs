//! First-pass marker emission

use cr_core::{AliasTable, RatingCode, UnitId};
use cr_redact::{InlineMarkers, block_markers};
use cr_storage::{RatingBackend, RatingStore, Result};

/// Emits rating directives and boundary markers while a page renders.
pub struct MarkerEmitter<'a, B> {
    table: &'a AliasTable,
    store: &'a RatingStore<B>,
    strict: bool,
}

impl<B> Clone for MarkerEmitter<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for MarkerEmitter<'_, B> {}

impl<'a, B: RatingBackend> MarkerEmitter<'a, B> {
    pub fn new(table: &'a AliasTable, store: &'a RatingStore<B>, strict: bool) -> Self {
        Self {
            table,
            store,
            strict,
        }
    }

    /// Handle a `{{#rating: ...}}` directive for `unit`.
    ///
    /// The classified code replaces the unit's stored rating; unknown or
    /// empty text clears it. Returns the canonical code for the caller to
    /// surface inline.
    pub async fn emit_directive(&self, unit: UnitId, raw: &str) -> Result<Option<RatingCode>> {
        let code = self.table.classify(raw);
        tracing::debug!(%unit, raw, code = ?code, "rating directive");

        if let Err(e) = self.store.assign(unit, code.as_ref()).await {
            if self.strict {
                return Err(e);
            }
            tracing::warn!(%unit, error = %e, "failed to persist rating");
        }
        Ok(code)
    }

    /// Boundary text for a `<rating start=.. end=..>` tag.
    ///
    /// Each end is classified on its own; text that doesn't classify emits
    /// no marker for that end.
    pub fn emit_block_markers(&self, start_raw: Option<&str>, end_raw: Option<&str>) -> String {
        let start = start_raw.and_then(|s| self.table.classify(s));
        let end = end_raw.and_then(|s| self.table.classify(s));
        block_markers(start.as_ref(), end.as_ref())
    }

    /// Same as [`Self::emit_block_markers`], reading `start`/`end` from tag
    /// attributes. Attribute names are case-insensitive; others are ignored.
    pub fn emit_block_tag<'t, I>(&self, attrs: I) -> String
    where
        I: IntoIterator<Item = (&'t str, &'t str)>,
    {
        let mut start = None;
        let mut end = None;
        for (name, value) in attrs {
            if name.eq_ignore_ascii_case("start") {
                start = Some(value);
            } else if name.eq_ignore_ascii_case("end") {
                end = Some(value);
            }
        }
        self.emit_block_markers(start, end)
    }

    /// Prefix/suffix to splice around `unit`'s rendered embed; empty when
    /// the unit is unrated.
    pub async fn emit_inline_markers(&self, unit: UnitId) -> Result<InlineMarkers> {
        let rating = if self.strict {
            self.store.try_get_rating(unit).await?
        } else {
            self.store.get_rating(unit).await
        };
        Ok(InlineMarkers::for_rating(rating.as_ref()))
    }
}
