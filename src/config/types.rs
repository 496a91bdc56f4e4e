//! Input file types.
//!
//! People and rules are supplied as documents wrapping an array under a
//! top-level key:
//!
//! ```text
//! {"people": [{"name": ..., "hourlyRate": ..., ...}, ...]}
//! {"rules":  [{"applicableWeeks": "1-26", ...}, ...]}
//! ```

use std::path::Path;

/// Top-level key of a people document.
pub const PEOPLE_KEY: &str = "people";

/// Top-level key of a rules document.
pub const RULES_KEY: &str = "rules";

/// The syntax of an input document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// JSON (the default for any extension other than YAML's).
    Json,
    /// YAML (`.yaml` or `.yml`).
    Yaml,
}

impl InputFormat {
    /// Picks the format for `path` from its extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                InputFormat::Yaml
            }
            _ => InputFormat::Json,
        }
    }
}
