use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::ReplaceMode;

/// Team display-name overrides, e.g. "FC Bayern München" -> "Bayern" / "FCB".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Replacements {
    #[serde(default)]
    pub default: HashMap<String, String>,
    #[serde(default)]
    pub short: HashMap<String, String>,
}

impl Replacements {
    /// A missing file is an empty table; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("read {}", path.display()));
            }
        };
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid replacements json in {}", path.display()))
    }

    pub fn display_name<'a>(&'a self, team: &'a str, mode: ReplaceMode) -> Cow<'a, str> {
        // Both modes are keyed off the default table.
        if !self.default.contains_key(team) {
            return Cow::Borrowed(team);
        }
        let table = match mode {
            ReplaceMode::Default => &self.default,
            ReplaceMode::Short => &self.short,
            ReplaceMode::None => return Cow::Borrowed(team),
        };
        table
            .get(team)
            .map(|name| Cow::Borrowed(name.as_str()))
            .unwrap_or(Cow::Borrowed(team))
    }
}
