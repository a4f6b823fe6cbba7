//! Alias table and rating classifier
//!
//! The table maps each canonical [`RatingCode`] to the free-text aliases
//! authors may write. It is built once at startup and shared by handle; the
//! reverse index (alias -> code) is computed at construction and never
//! mutated afterwards.

use std::collections::HashMap;

use crate::{Error, RatingCode, Result};

/// Built-in rating codes and aliases, in redaction order
pub const DEFAULT_RATINGS: &[(&str, &[&str])] = &[
    ("R15", &["R15", "R-15", "R 15", "15"]),
    ("R18", &["R18", "R-18", "R 18", "18"]),
    ("R18G", &["R18G", "R-18G", "R 18G", "18G"]),
];

/// Ordered mapping of rating codes to their accepted aliases.
///
/// Iteration order is the order codes were registered in, which is also the
/// order the redaction engine resolves them in.
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<(RatingCode, Vec<String>)>,
    index: HashMap<String, RatingCode>,
}

impl AliasTable {
    /// Build a table from `(code, aliases)` pairs.
    ///
    /// Aliases are trimmed and compared case-insensitively; blank aliases are
    /// skipped. The code itself is always accepted as an alias of itself.
    pub fn new<I, C, A, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, A)>,
        C: AsRef<str>,
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };

        for (code, aliases) in entries {
            let code = RatingCode::new(code.as_ref())?;
            if table.entries.iter().any(|(existing, _)| existing == &code) {
                return Err(Error::DuplicateRatingCode(code.to_string()));
            }

            let mut names = Vec::new();
            for alias in std::iter::once(code.as_str().to_string())
                .chain(aliases.into_iter().map(|a| a.as_ref().trim().to_string()))
            {
                if alias.is_empty() {
                    continue;
                }
                let key = alias.to_uppercase();
                match table.index.get(&key) {
                    Some(owner) if owner == &code => continue,
                    Some(owner) => {
                        return Err(Error::AliasConflict {
                            alias,
                            first: owner.to_string(),
                            second: code.to_string(),
                        });
                    }
                    None => {}
                }
                table.index.insert(key, code.clone());
                names.push(alias);
            }

            table.entries.push((code, names));
        }

        Ok(table)
    }

    /// Registered codes in processing order
    pub fn codes(&self) -> impl Iterator<Item = &RatingCode> {
        self.entries.iter().map(|(code, _)| code)
    }

    /// Aliases registered for `code`, in declaration order
    pub fn aliases(&self, code: &RatingCode) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, aliases)| aliases.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, text: &str) -> Option<RatingCode> {
        self.index.get(&text.to_uppercase()).cloned()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        let mut table = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };
        for &(code, aliases) in DEFAULT_RATINGS {
            let code = RatingCode(code.to_string());
            for alias in aliases {
                table.index.insert(alias.to_uppercase(), code.clone());
            }
            table
                .entries
                .push((code, aliases.iter().map(|a| a.to_string()).collect()));
        }
        table
    }
}

/// Normalizes free text into a canonical rating code.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    table: &'a AliasTable,
}

impl<'a> Classifier<'a> {
    pub fn new(table: &'a AliasTable) -> Self {
        Self { table }
    }

    /// Classify `text`; `None` means "no rating".
    ///
    /// Input is trimmed and matched case-insensitively against the full
    /// alias set. Unknown text is not an error.
    pub fn classify(&self, text: &str) -> Option<RatingCode> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.table.lookup(text)
    }
}

impl AliasTable {
    pub fn classifier(&self) -> Classifier<'_> {
        Classifier::new(self)
    }

    /// Shorthand for `self.classifier().classify(text)`
    pub fn classify(&self, text: &str) -> Option<RatingCode> {
        self.classifier().classify(text)
    }
}
