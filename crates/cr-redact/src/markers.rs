//! Marker token shapes
//!
//! Block markers are empty element pairs so they survive HTML sanitizing
//! and render as nothing if ever left behind:
//! `<rating-start-r18></rating-start-r18>` ... `<rating-end-r18></rating-end-r18>`.
//!
//! Inline markers turn a single media embed into an HTML comment:
//! `<!--cr-r18-` ... `-r18-cr-->`. Codes inside tokens are always lowercase.

use cr_core::RatingCode;

pub fn block_start(code: &RatingCode) -> String {
    let name = code.marker_name();
    format!("<rating-start-{name}></rating-start-{name}>")
}

pub fn block_end(code: &RatingCode) -> String {
    let name = code.marker_name();
    format!("<rating-end-{name}></rating-end-{name}>")
}

/// Boundary text for a `<rating start=.. end=..>` tag.
///
/// The end marker comes first so a single tag can close one region and open
/// the next. Missing codes emit nothing for that end.
pub fn block_markers(start: Option<&RatingCode>, end: Option<&RatingCode>) -> String {
    let mut out = String::new();
    if let Some(end) = end {
        out.push_str(&block_end(end));
    }
    if let Some(start) = start {
        out.push_str(&block_start(start));
    }
    out
}

/// Prefix/suffix pair spliced around one rendered media embed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineMarkers {
    pub prefix: String,
    pub suffix: String,
}

impl InlineMarkers {
    /// Markers for a unit rated `code`; empty when unrated
    pub fn for_rating(code: Option<&RatingCode>) -> Self {
        match code {
            Some(code) => {
                let name = code.marker_name();
                Self {
                    prefix: format!("<!--cr-{name}-"),
                    suffix: format!("-{name}-cr-->"),
                }
            }
            None => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }

    pub fn wrap(&self, html: &str) -> String {
        format!("{}{}{}", self.prefix, html, self.suffix)
    }
}
