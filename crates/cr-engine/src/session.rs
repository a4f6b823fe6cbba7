//! First rendering pass for one content unit

use cr_core::{RatingCode, UnitId};
use cr_storage::{RatingBackend, Result};

use crate::MarkerEmitter;

/// Output of a first pass: marked-up text plus the unit's rating property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub unit: UnitId,
    pub text: String,
    pub rating: Option<RatingCode>,
}

/// Collects markers while one unit's markup is rendered.
///
/// Directives write through to the store as they are seen; the last one
/// wins and is also recorded on the finished artifact.
pub struct RenderSession<'a, B> {
    emitter: MarkerEmitter<'a, B>,
    unit: UnitId,
    rating: Option<RatingCode>,
    text: String,
}

impl<'a, B: RatingBackend> RenderSession<'a, B> {
    pub fn new(emitter: MarkerEmitter<'a, B>, unit: UnitId) -> Self {
        Self {
            emitter,
            unit,
            rating: None,
            text: String::new(),
        }
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn rating(&self) -> Option<&RatingCode> {
        self.rating.as_ref()
    }

    /// Append already-rendered text
    pub fn push_str(&mut self, html: &str) {
        self.text.push_str(html);
    }

    /// `{{#rating: raw}}`: returns the canonical code, or an empty string
    /// when the text didn't classify. Nothing is appended.
    pub async fn directive(&mut self, raw: &str) -> Result<String> {
        self.rating = self.emitter.emit_directive(self.unit, raw).await?;
        Ok(self
            .rating
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_default())
    }

    /// `<rating start=.. end=..>`: appends the boundary markers
    pub fn block_tag<'t, I>(&mut self, attrs: I)
    where
        I: IntoIterator<Item = (&'t str, &'t str)>,
    {
        let markers = self.emitter.emit_block_tag(attrs);
        self.text.push_str(&markers);
    }

    /// Append an embed of `media`, wrapped in inline markers if it is rated
    pub async fn embed(&mut self, media: UnitId, html: &str) -> Result<()> {
        let markers = self.emitter.emit_inline_markers(media).await?;
        self.text.push_str(&markers.wrap(html));
        Ok(())
    }

    pub fn finish(self) -> RenderedArtifact {
        RenderedArtifact {
            unit: self.unit,
            text: self.text,
            rating: self.rating,
        }
    }
}
