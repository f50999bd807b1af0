//! Platform-neutral language identifiers.
//!
//! Android spells Brazilian Portuguese `pt-rBR`, iOS spells it `pt-BR`. Both
//! collapse to the generic identifier `pt_BR`, so translations coming from
//! either platform land in the same slot of the index.

use std::{borrow::Borrow, fmt::Display};

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct GenericLanguage(String);

impl GenericLanguage {
    /// Normalizes a platform language tag.
    ///
    /// The Android region marker (`-r` before an uppercase region) and every
    /// remaining `-` become `_`. The empty tag of Android's default `values`
    /// directory stays empty.
    pub fn normalize(tag: &str) -> Self {
        let tag = tag.trim();
        let mut out = String::with_capacity(tag.len());
        let mut chars = tag.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '-' {
                out.push(c);
                continue;
            }
            out.push('_');
            let mut lookahead = chars.clone();
            if lookahead.next() == Some('r')
                && lookahead.next().is_some_and(|n| n.is_ascii_uppercase())
            {
                chars.next();
            }
        }
        GenericLanguage(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses the identifier as a BCP 47 language identifier.
    pub fn language_identifier(&self) -> Option<LanguageIdentifier> {
        self.0.replace('_', "-").parse().ok()
    }
}

impl Display for GenericLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GenericLanguage {
    fn from(value: &str) -> Self {
        GenericLanguage::normalize(value)
    }
}

impl From<String> for GenericLanguage {
    fn from(value: String) -> Self {
        GenericLanguage::normalize(&value)
    }
}

impl AsRef<str> for GenericLanguage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for GenericLanguage {
    fn borrow(&self) -> &str {
        &self.0
    }
}
