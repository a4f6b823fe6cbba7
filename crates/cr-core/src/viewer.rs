//! Viewer permissions
//!
//! The host owns preference storage; it hands us a [`Viewer`] per request.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{AliasTable, RatingCode};

const PREFERENCE_PREFIX: &str = "cr-allow-";

/// Per-code "may view content at this rating" flags.
///
/// Codes without an entry are treated as not allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerPermissions {
    allowed: HashMap<RatingCode, bool>,
}

impl ViewerPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, code: RatingCode, allowed: bool) -> Self {
        self.set(code, allowed);
        self
    }

    pub fn set(&mut self, code: RatingCode, allowed: bool) {
        self.allowed.insert(code, allowed);
    }

    pub fn allows(&self, code: &RatingCode) -> bool {
        self.allowed.get(code).copied().unwrap_or(false)
    }

    /// Host preference key for `code`, e.g. `cr-allow-r18`
    pub fn preference_key(code: &RatingCode) -> String {
        format!("{}{}", PREFERENCE_PREFIX, code.marker_name())
    }

    /// Build from host preference pairs.
    ///
    /// Keys that are not `cr-allow-*` are ignored. Values `1`, `true`, `on`
    /// and `yes` allow; anything else denies.
    pub fn from_preferences<'a, I>(prefs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut perms = Self::new();
        for (key, value) in prefs {
            let Some(name) = key.strip_prefix(PREFERENCE_PREFIX) else {
                continue;
            };
            let Ok(code) = RatingCode::new(name) else {
                continue;
            };
            let allowed = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            );
            perms.set(code, allowed);
        }
        perms
    }
}

/// The viewer a document is being rendered for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    /// False for anonymous or blocked viewers
    pub eligible: bool,
    pub permissions: ViewerPermissions,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn registered(permissions: ViewerPermissions) -> Self {
        Self {
            eligible: true,
            permissions,
        }
    }

    /// Whether this viewer may see content rated `code`
    pub fn allows(&self, code: &RatingCode) -> bool {
        self.eligible && self.permissions.allows(code)
    }
}

/// One show/hide preference offered to an eligible viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceDescriptor {
    pub key: String,
    pub code: RatingCode,
    /// Current value, defaults to hidden
    pub show: bool,
}

/// Preferences to offer `viewer`, one per registered code.
///
/// Ineligible viewers get none.
pub fn preference_descriptors(table: &AliasTable, viewer: &Viewer) -> Vec<PreferenceDescriptor> {
    if !viewer.eligible {
        return Vec::new();
    }
    table
        .codes()
        .map(|code| PreferenceDescriptor {
            key: ViewerPermissions::preference_key(code),
            code: code.clone(),
            show: viewer.permissions.allows(code),
        })
        .collect()
}
