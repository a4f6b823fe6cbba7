use cr_core::{AliasTable, RatingCode, Viewer};
use regex::Regex;
use serde::{Deserialize, Serialize};

const TOKEN_PATTERN: &str = concat!(
    r"<rating-(?P<kind>start|end)-(?P<code>[a-z0-9]+)></rating-(?P<kind2>start|end)-(?P<code2>[a-z0-9]+)>",
    r"|<!--cr-(?P<open>[a-z0-9]+)-",
    r"|-(?P<close>[a-z0-9]+)-cr-->",
);

#[derive(Debug, thiserror::Error)]
pub enum RedactError {
    #[error("failed to compile marker pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// What happened to one rating code's markers in a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionInfo {
    /// Lowercase code as it appeared in the markers
    pub code: String,
    /// Regions deleted together with their content
    pub removed_regions: usize,
    /// Marker tokens stripped while keeping content
    pub unwrapped_markers: usize,
    /// Unpaired tokens left in the output
    pub orphaned_markers: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Block,
    Inline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Open,
    Close,
}

#[derive(Debug)]
struct Token<'t> {
    start: usize,
    end: usize,
    family: Family,
    edge: Edge,
    code: &'t str,
}

/// Second-pass redaction engine.
///
/// The document is tokenized once; regions are then resolved code by code in
/// alias table order, followed by any unregistered codes in order of first
/// appearance. A region deleted while resolving one code takes every token
/// inside it along, so nothing is matched twice.
pub struct Redactor {
    pattern: Regex,
    order: Vec<String>,
}

impl Redactor {
    pub fn new(table: &AliasTable) -> Result<Self, RedactError> {
        Ok(Self {
            pattern: Regex::new(TOKEN_PATTERN)?,
            order: table.codes().map(RatingCode::marker_name).collect(),
        })
    }

    /// Redact `text` for `viewer`
    pub fn redact(&self, text: &str, viewer: &Viewer) -> String {
        self.redact_with_report(text, viewer).0
    }

    /// Redact `text` for `viewer`, reporting per-code outcomes
    pub fn redact_with_report(&self, text: &str, viewer: &Viewer) -> (String, Vec<RedactionInfo>) {
        let tokens = self.tokenize(text);
        if tokens.is_empty() {
            return (text.to_string(), Vec::new());
        }

        let mut alive = vec![true; tokens.len()];
        let mut cuts: Vec<(usize, usize)> = Vec::new();
        let mut report = Vec::new();

        for code in self.processing_order(&tokens) {
            let allowed = RatingCode::new(code).is_ok_and(|c| viewer.allows(&c));
            let mut info = RedactionInfo {
                code: code.to_string(),
                ..Default::default()
            };

            if allowed {
                for (i, token) in tokens.iter().enumerate() {
                    if alive[i] && token.code == code {
                        alive[i] = false;
                        cuts.push((token.start, token.end));
                        info.unwrapped_markers += 1;
                    }
                }
            } else {
                for family in [Family::Block, Family::Inline] {
                    info.removed_regions +=
                        remove_regions(&tokens, &mut alive, &mut cuts, code, family);
                }
            }

            report.push(info);
        }

        for info in &mut report {
            info.orphaned_markers = tokens
                .iter()
                .zip(&alive)
                .filter(|(token, alive)| **alive && token.code == info.code)
                .count();
            if info.orphaned_markers > 0 {
                tracing::warn!(
                    code = %info.code,
                    count = info.orphaned_markers,
                    "unbalanced rating markers left in output"
                );
            }
        }

        (splice(text, cuts), report)
    }

    fn tokenize<'t>(&self, text: &'t str) -> Vec<Token<'t>> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < text.len() {
            let Some(caps) = self.pattern.captures_at(text, pos) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };

            let (family, edge, code) = if let (Some(kind), Some(code), Some(kind2), Some(code2)) = (
                caps.name("kind"),
                caps.name("code"),
                caps.name("kind2"),
                caps.name("code2"),
            ) {
                if kind.as_str() != kind2.as_str() || code.as_str() != code2.as_str() {
                    // the match starts with '<', so +1 stays on a char boundary
                    pos = whole.start() + 1;
                    continue;
                }
                let edge = if kind.as_str() == "start" {
                    Edge::Open
                } else {
                    Edge::Close
                };
                (Family::Block, edge, code.as_str())
            } else if let Some(code) = caps.name("open") {
                (Family::Inline, Edge::Open, code.as_str())
            } else if let Some(code) = caps.name("close") {
                (Family::Inline, Edge::Close, code.as_str())
            } else {
                break;
            };

            tokens.push(Token {
                start: whole.start(),
                end: whole.end(),
                family,
                edge,
                code,
            });
            pos = whole.end();
        }

        tokens
    }

    fn processing_order<'a>(&'a self, tokens: &[Token<'a>]) -> Vec<&'a str> {
        let mut order: Vec<&str> = self
            .order
            .iter()
            .map(String::as_str)
            .filter(|code| tokens.iter().any(|t| t.code == *code))
            .collect();
        for token in tokens {
            if !order.contains(&token.code) {
                order.push(token.code);
            }
        }
        order
    }
}

/// Delete every `code` region of `family`, binding each open token to the
/// first close token after it. Returns the number of regions removed.
fn remove_regions(
    tokens: &[Token<'_>],
    alive: &mut [bool],
    cuts: &mut Vec<(usize, usize)>,
    code: &str,
    family: Family,
) -> usize {
    let mut open: Option<usize> = None;
    let mut removed = 0;

    for (i, token) in tokens.iter().enumerate() {
        if !alive[i] || token.code != code || token.family != family {
            continue;
        }
        match (token.edge, open) {
            (Edge::Open, None) => open = Some(i),
            (Edge::Close, Some(first)) => {
                cuts.push((tokens[first].start, token.end));
                alive[first..=i].iter_mut().for_each(|a| *a = false);
                open = None;
                removed += 1;
            }
            _ => {}
        }
    }

    removed
}

fn splice(text: &str, mut cuts: Vec<(usize, usize)>) -> String {
    cuts.sort_unstable();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for (start, end) in cuts {
        if start > pos {
            out.push_str(&text[pos..start]);
        }
        pos = pos.max(end);
    }
    out.push_str(&text[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::{InlineMarkers, block_end, block_markers, block_start};
    use cr_core::ViewerPermissions;

    fn code(s: &str) -> RatingCode {
        RatingCode::new(s).unwrap()
    }

    fn redactor() -> Redactor {
        Redactor::new(&AliasTable::default()).unwrap()
    }

    fn wrap(c: &str, inner: &str) -> String {
        let c = code(c);
        format!("{}{}{}", block_start(&c), inner, block_end(&c))
    }

    fn inline(c: &str, inner: &str) -> String {
        InlineMarkers::for_rating(Some(&code(c))).wrap(inner)
    }

    fn viewer(allowed: &[&str]) -> Viewer {
        let mut perms = ViewerPermissions::new();
        for c in ["R15", "R18", "R18G"] {
            perms.set(code(c), allowed.contains(&c));
        }
        Viewer::registered(perms)
    }

    #[test]
    fn test_allowed_region_is_unwrapped() {
        let doc = format!("before {} after", wrap("R18", "<p>secret</p>"));
        assert_eq!(redactor().redact(&doc, &viewer(&["R18"])), "before <p>secret</p> after");
    }

    #[test]
    fn test_denied_region_is_removed() {
        let doc = format!("before {} after", wrap("R18", "<p>secret</p>"));
        assert_eq!(redactor().redact(&doc, &viewer(&[])), "before  after");
    }

    #[test]
    fn test_ineligible_ignores_permissions() {
        let doc = format!(
            "a{}b{}c",
            wrap("R15", "x"),
            inline("R18", "<img src=\"y.png\">")
        );
        let r = redactor();
        let mut anon = viewer(&["R15", "R18", "R18G"]);
        anon.eligible = false;

        assert_eq!(r.redact(&doc, &anon), "abc");
        assert_eq!(r.redact(&doc, &anon), r.redact(&doc, &viewer(&[])));
    }

    #[test]
    fn test_codes_resolve_independently() {
        let doc = format!("{}|{}", wrap("R15", "fifteen"), wrap("R18", "eighteen"));
        let r = redactor();

        assert_eq!(r.redact(&doc, &viewer(&["R15"])), "fifteen|");
        assert_eq!(r.redact(&doc, &viewer(&["R18"])), "|eighteen");
        assert_eq!(r.redact(&doc, &viewer(&["R15", "R18"])), "fifteen|eighteen");
        assert_eq!(r.redact(&doc, &viewer(&[])), "|");
    }

    #[test]
    fn test_nested_regions_of_different_codes() {
        let doc = wrap("R15", &format!("x{}z", wrap("R18", "y")));
        let r = redactor();

        assert_eq!(r.redact(&doc, &viewer(&["R15"])), "xz");
        assert_eq!(r.redact(&doc, &viewer(&["R18"])), "");
        assert_eq!(r.redact(&doc, &viewer(&["R15", "R18"])), "xyz");
    }

    #[test]
    fn test_adjacent_same_code_regions() {
        let doc = format!("{}{}|{}", wrap("R18", "a"), wrap("R18", "b"), wrap("R18", "c"));
        let r = redactor();

        assert_eq!(r.redact(&doc, &viewer(&[])), "|");
        assert_eq!(r.redact(&doc, &viewer(&["R18"])), "ab|c");
    }

    #[test]
    fn test_start_binds_to_own_code_end() {
        // an R15 end inside an R18 region must not close it
        let r15 = code("R15");
        let doc = format!(
            "{}a{}b{}",
            block_start(&code("R18")),
            block_end(&r15),
            block_end(&code("R18"))
        );
        let r = redactor();

        assert_eq!(r.redact(&doc, &viewer(&["R15"])), "");
        assert_eq!(r.redact(&doc, &viewer(&["R18"])), format!("a{}b", block_end(&r15)));
    }

    #[test]
    fn test_repeated_start_is_non_greedy() {
        let s = block_start(&code("R18"));
        let e = block_end(&code("R18"));
        let doc = format!("{s}a{s}b{e}c{e}");

        assert_eq!(redactor().redact(&doc, &viewer(&[])), format!("c{e}"));
        assert_eq!(redactor().redact(&doc, &viewer(&["R18"])), "abc");
    }

    #[test]
    fn test_inline_markers() {
        let doc = format!("<ul><li>{}</li></ul>", inline("R18", "<img src=\"a.png\">"));
        let r = redactor();

        assert_eq!(r.redact(&doc, &viewer(&["R18"])), "<ul><li><img src=\"a.png\"></li></ul>");
        assert_eq!(r.redact(&doc, &viewer(&[])), "<ul><li></li></ul>");
    }

    #[test]
    fn test_inline_codes_do_not_cross_match() {
        // r18 must not swallow an r18g embed
        let doc = format!("{}-{}", inline("R18G", "g"), inline("R18", "e"));
        let r = redactor();

        assert_eq!(r.redact(&doc, &viewer(&["R18G"])), "g-");
        assert_eq!(r.redact(&doc, &viewer(&["R18"])), "-e");
    }

    #[test]
    fn test_empty_inline_content() {
        let doc = format!("[{}]", inline("R15", ""));
        assert_eq!(doc, "[<!--cr-r15--r15-cr-->]");
        let r = redactor();

        assert_eq!(r.redact(&doc, &viewer(&["R15"])), "[]");
        assert_eq!(r.redact(&doc, &viewer(&[])), "[]");
    }

    #[test]
    fn test_orphans_stay_when_denied_and_go_when_allowed() {
        let doc = format!("a{}b", block_start(&code("R18")));
        let r = redactor();

        let (out, report) = r.redact_with_report(&doc, &viewer(&[]));
        assert_eq!(out, doc);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].orphaned_markers, 1);

        let (out, report) = r.redact_with_report(&doc, &viewer(&["R18"]));
        assert_eq!(out, "ab");
        assert_eq!(report[0].unwrapped_markers, 1);
        assert_eq!(report[0].orphaned_markers, 0);
    }

    #[test]
    fn test_mismatched_codes_left_literal() {
        let doc = format!(
            "{}x{}",
            block_start(&code("R15")),
            block_end(&code("R18"))
        );
        assert_eq!(redactor().redact(&doc, &viewer(&[])), doc);
    }

    #[test]
    fn test_malformed_tag_is_not_a_marker() {
        let doc = "<rating-start-r15></rating-start-r18>x<rating-end-r15></rating-end-r15>";
        let out = redactor().redact(doc, &viewer(&[]));
        assert_eq!(out, doc);
    }

    #[test]
    fn test_unregistered_code_defaults_to_removal() {
        let doc = format!("a{}b", wrap("PG13", "teen"));
        let r = redactor();

        assert_eq!(r.redact(&doc, &viewer(&["R15", "R18", "R18G"])), "ab");
        assert_eq!(r.redact(&doc, &Viewer::anonymous()), "ab");

        let allowing = Viewer::registered(ViewerPermissions::new().with(code("PG13"), true));
        assert_eq!(r.redact(&doc, &allowing), "ateenb");
    }

    #[test]
    fn test_idempotent() {
        let s = block_start(&code("R18"));
        let e = block_end(&code("R15"));
        let docs = [
            format!("x{}y{}z", wrap("R15", "a"), inline("R18", "b")),
            format!("{s}a{s}b{}c", block_end(&code("R18"))),
            format!("{e}dangling{s}"),
            wrap("R15", &format!("x{}z", wrap("R18", "y"))),
        ];
        let r = redactor();

        for doc in &docs {
            for v in [viewer(&[]), viewer(&["R15"]), viewer(&["R18"]), Viewer::anonymous()] {
                let once = r.redact(doc, &v);
                assert_eq!(r.redact(&once, &v), once, "{doc}");
            }
        }
    }

    #[test]
    fn test_plain_text_untouched() {
        let doc = "<!-- a comment --> <rating>not a marker</rating> -cr-->";
        let (out, report) = redactor().redact_with_report(doc, &viewer(&[]));
        assert_eq!(out, doc);
        assert!(report.is_empty());
    }

    #[test]
    fn test_multiline_regions() {
        let doc = format!("top\n{}\nbottom", wrap("R18G", "\n<p>line1</p>\n<p>line2</p>\n"));
        assert_eq!(redactor().redact(&doc, &viewer(&[])), "top\n\nbottom");
    }

    #[test]
    fn test_directive_tag_with_distinct_start_and_end() {
        // <rating start=R15/> ... <rating end=R15 start=R18/> ... <rating end=R18/>
        let r15 = code("R15");
        let r18 = code("R18");
        let doc = format!(
            "{}one{}two{}",
            block_markers(Some(&r15), None),
            block_markers(Some(&r18), Some(&r15)),
            block_markers(None, Some(&r18))
        );
        let r = redactor();

        assert_eq!(r.redact(&doc, &viewer(&["R15"])), "one");
        assert_eq!(r.redact(&doc, &viewer(&["R18"])), "two");
    }

    #[test]
    fn test_report_counts() {
        let doc = format!("{}{}{}", wrap("R15", "a"), wrap("R15", "b"), inline("R18", "c"));
        let (_, report) = redactor().redact_with_report(&doc, &viewer(&["R18"]));

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].code, "r15");
        assert_eq!(report[0].removed_regions, 2);
        assert_eq!(report[1].code, "r18");
        assert_eq!(report[1].unwrapped_markers, 2);
    }
}
