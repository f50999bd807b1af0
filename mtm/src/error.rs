//! All error types for the mtm crate.
//!
//! Every fallible operation (reading resources, building or loading the index,
//! ingesting edits, writing back) returns [`Error`]. Fatal conditions abort the
//! running pass; recoverable ones are reported as
//! [`Diagnostic`](crate::report::Diagnostic)s instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::fuzzy::FuzzySlot;

#[derive(Error, Debug)]
pub enum Error {
    #[error("structural inconsistency: {0}")]
    StructuralInconsistency(Inconsistency),

    #[error("unsupported string kind `{0}`")]
    UnsupportedKind(String),

    #[error("invalid index: {0}")]
    InvalidIndex(String),

    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("config error: {0}")]
    Config(String),
}

/// The index and the resource files have diverged beyond automatic repair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// A translated file has a key that the default-language file does not.
    #[error("key `{key}` ({language}) in {} has no default-language entry", path.display())]
    OrphanKey {
        key: String,
        language: String,
        path: PathBuf,
    },

    /// Write-back was requested while conflicting translations are pending.
    #[error("{} unresolved fuzzy translation(s): {}", slots.len(), describe_slots(slots))]
    UnresolvedFuzzy { slots: Vec<FuzzySlot> },

    /// An edit addressed an entry that is not in the index.
    #[error("no entry for key `{key}` ({language})")]
    UnknownEntry { key: String, language: String },
}

fn describe_slots(slots: &[FuzzySlot]) -> String {
    slots
        .iter()
        .map(|slot| format!("`{}` [{}]", slot.value, slot.language))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<Inconsistency> for Error {
    fn from(value: Inconsistency) -> Self {
        Error::StructuralInconsistency(value)
    }
}

impl Error {
    /// Creates a new index validation error
    pub fn invalid_index(message: impl Into<String>) -> Self {
        Error::InvalidIndex(message.into())
    }

    /// Creates a new config error
    pub fn config_error(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Whether the error is one of the fatal structural conditions.
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::StructuralInconsistency(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_orphan_key_names_key_language_and_file() {
        let error: Error = Inconsistency::OrphanKey {
            key: "GREETING".to_string(),
            language: "fr".to_string(),
            path: PathBuf::from("app/res/values-fr/strings.xml"),
        }
        .into();
        let display = error.to_string();
        assert!(display.starts_with("structural inconsistency"));
        assert!(display.contains("GREETING"));
        assert!(display.contains("fr"));
        assert!(display.contains("values-fr/strings.xml"));
        assert!(error.is_structural());
    }

    #[test]
    fn test_unresolved_fuzzy_lists_slots() {
        let error: Error = Inconsistency::UnresolvedFuzzy {
            slots: vec![FuzzySlot {
                value: "Hello".to_string(),
                language: "fr".to_string(),
                candidates: vec!["Bonjour".to_string(), "Salut".to_string()],
            }],
        }
        .into();
        let display = error.to_string();
        assert!(display.contains("1 unresolved fuzzy translation(s)"));
        assert!(display.contains("`Hello` [fr]"));
    }

    #[test]
    fn test_unsupported_kind_error() {
        let error = Error::UnsupportedKind("string-array".to_string());
        assert_eq!(error.to_string(), "unsupported string kind `string-array`");
        assert!(!error.is_structural());
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_invalid_index_error() {
        let error = Error::invalid_index("entry `Hello` has no keys");
        assert_eq!(error.to_string(), "invalid index: entry `Hello` has no keys");
    }

    #[test]
    fn test_parse_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let error = Error::Parse(json_error);
        assert!(error.to_string().contains("parse error"));
    }
}
