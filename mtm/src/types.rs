//! Core, format-agnostic record types for mtm.
//! Readers decode resource files into these; writers serialize these.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{error::Error, language::GenericLanguage, placeholder::PlaceholderMap};

/// Kind of a localized string. Only simple strings are indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum StringKind {
    Simple,
    Plural,
}

impl StringKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StringKind::Simple => "string",
            StringKind::Plural => "plural",
        }
    }
}

impl Display for StringKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StringKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "simple" => Ok(StringKind::Simple),
            "plural" | "plurals" => Ok(StringKind::Plural),
            other => Err(Error::UnsupportedKind(other.to_string())),
        }
    }
}

impl TryFrom<String> for StringKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StringKind> for String {
    fn from(value: StringKind) -> Self {
        value.as_str().to_string()
    }
}

/// One quantity form of a plural resource, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PluralItem {
    pub quantity: String,
    pub value: String,
}

/// One localized entry as produced by a format reader.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceRecord {
    /// The resource key (`name` attribute, `.strings` key).
    pub key: String,

    pub kind: StringKind,

    pub translatable: bool,

    /// Raw value as it appears in the file, specifiers included.
    pub value: String,

    /// Quantity forms for plural records; empty for simple strings.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub plural_items: Vec<PluralItem>,

    /// Comment lines that precede the entry (Apple `.strings` only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub comments: Vec<String>,
}

impl ResourceRecord {
    pub fn simple(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: StringKind::Simple,
            translatable: true,
            value: value.into(),
            plural_items: Vec::new(),
            comments: Vec::new(),
        }
    }

    pub fn plural(key: impl Into<String>, items: Vec<PluralItem>) -> Self {
        Self {
            key: key.into(),
            kind: StringKind::Plural,
            translatable: true,
            value: String::new(),
            plural_items: items,
            comments: Vec::new(),
        }
    }

    pub fn untranslatable(mut self) -> Self {
        self.translatable = false;
        self
    }

    /// Whether the index tracks this record.
    pub fn is_indexed(&self) -> bool {
        self.kind == StringKind::Simple && self.translatable
    }

    /// Canonical value and the placeholders removed from the raw value.
    pub fn canonical(&self) -> (String, PlaceholderMap) {
        crate::placeholder::extract(&self.value)
    }
}

impl Display for ResourceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ResourceRecord {{ key: {}, kind: {}, value: {} }}",
            self.key, self.kind, self.value
        )
    }
}

/// Platform a resource file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Android,
    Ios,
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Android => write!(f, "android"),
            Platform::Ios => write!(f, "ios"),
        }
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

/// All records of one localized resource file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFile {
    pub path: PathBuf,
    pub platform: Platform,
    /// Platform-specific language tag (`pt-rBR`, `pt-BR`, empty for the Android default).
    pub language: String,
    pub generic_language: GenericLanguage,
    pub is_default: bool,
    pub records: Vec<ResourceRecord>,
}

impl ResourceFile {
    pub fn new(
        path: impl AsRef<Path>,
        platform: Platform,
        language: impl Into<String>,
        is_default: bool,
    ) -> Self {
        let language = language.into();
        Self {
            path: path.as_ref().to_path_buf(),
            platform,
            generic_language: GenericLanguage::normalize(&language),
            language,
            is_default,
            records: Vec::new(),
        }
    }

    pub fn with_records(mut self, records: Vec<ResourceRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn find_record(&self, key: &str) -> Option<&ResourceRecord> {
        self.records.iter().find(|r| r.key == key)
    }

    pub fn find_record_mut(&mut self, key: &str) -> Option<&mut ResourceRecord> {
        self.records.iter_mut().find(|r| r.key == key)
    }

    /// Records the index tracks, in file order.
    pub fn indexed_records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.records.iter().filter(|r| r.is_indexed())
    }
}
