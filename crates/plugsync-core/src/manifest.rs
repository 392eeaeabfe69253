//! Plugin manifest (`metadata.txt`) parsing
//!
//! The manifest is INI text. Only `[general] version` drives updates, but
//! every section is kept so callers can display the rest.

use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

const GENERAL: &str = "general";

/// A malformed manifest line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

impl SyntaxError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Parsed manifest: section name to key/value pairs.
///
/// Section names keep their case; keys are lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Manifest {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl Manifest {
    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = plugsync_fs::io::read_text(path)?;
        Self::parse(&text).map_err(|source| Error::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse manifest text.
    ///
    /// Accepts `key = value` and `key: value`, full-line `#` and `;`
    /// comments, and indented continuation lines. A blank line ends the
    /// current value. Duplicate sections or keys, content before the first
    /// section header, and lines without a delimiter are rejected.
    pub fn parse(text: &str) -> std::result::Result<Self, SyntaxError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut section: Option<String> = None;
        // Key being built and the indentation it started at
        let mut open: Option<(String, usize)> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                open = None;
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indent = raw.len() - raw.trim_start().len();

            if let (Some((key, key_indent)), Some(name)) = (&open, &section) {
                if indent > *key_indent {
                    if let Some(value) = sections.get_mut(name).and_then(|s| s.get_mut(key)) {
                        value.push('\n');
                        value.push_str(trimmed);
                    }
                    continue;
                }
            }

            if let Some(rest) = trimmed.strip_prefix('[') {
                let Some(end) = rest.rfind(']') else {
                    return Err(SyntaxError::new(line_no, "unterminated section header"));
                };
                let name = rest[..end].to_string();
                if name.is_empty() {
                    return Err(SyntaxError::new(line_no, "empty section name"));
                }
                if sections.contains_key(&name) {
                    return Err(SyntaxError::new(
                        line_no,
                        format!("section '{name}' already exists"),
                    ));
                }
                sections.insert(name.clone(), BTreeMap::new());
                section = Some(name);
                open = None;
                continue;
            }

            let Some(name) = &section else {
                return Err(SyntaxError::new(line_no, "entry before any section header"));
            };

            let Some(split) = trimmed.find(['=', ':']) else {
                return Err(SyntaxError::new(
                    line_no,
                    format!("expected 'key = value', found '{trimmed}'"),
                ));
            };
            let key = trimmed[..split].trim().to_lowercase();
            let value = trimmed[split + 1..].trim().to_string();
            if key.is_empty() {
                return Err(SyntaxError::new(line_no, "empty key"));
            }

            let entries = sections.entry(name.clone()).or_default();
            if entries.contains_key(&key) {
                return Err(SyntaxError::new(
                    line_no,
                    format!("key '{key}' already exists in section '{name}'"),
                ));
            }
            entries.insert(key.clone(), value);
            open = Some((key, indent));
        }

        Ok(Self { sections })
    }

    /// Value of `key` in `section`, if both exist.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)?
            .get(&key.to_lowercase())
            .map(String::as_str)
    }

    /// The `[general]` section.
    pub fn general(&self) -> Option<&BTreeMap<String, String>> {
        self.sections.get(GENERAL)
    }

    /// `[general] version`, compared verbatim by the sync engine.
    pub fn version(&self) -> Option<&str> {
        self.get(GENERAL, "version")
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
