//! Ingestion of translations edited outside the resource files.
//!
//! Edits arrive as `(key, language, value)` triples, usually from a shared
//! translation sheet. They address entries by canonical value and go through
//! the same conflict rule as translated files do.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Inconsistency},
    index::TranslationIndex,
    language::GenericLanguage,
    merge::MergeOutcome,
    report::PassReport,
};

/// One remotely edited translation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Edit {
    /// Canonical value of the entry, or one of its original resource keys.
    pub key: String,
    pub language: GenericLanguage,
    /// Empty means "no translation supplied".
    pub value: String,
}

impl Edit {
    pub fn new(key: impl Into<String>, language: impl Into<GenericLanguage>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            language: language.into(),
            value: value.into(),
        }
    }
}

/// Applies one edit to the index.
///
/// The entry is looked up by canonical value first and by original resource
/// key second. An empty value stands for the canonical value itself.
pub fn apply_edit(
    index: &mut TranslationIndex,
    key: &str,
    language: &GenericLanguage,
    value: &str,
) -> Result<MergeOutcome, Error> {
    let entry = if index.get(key).is_some() {
        index.get_mut(key)
    } else {
        index.find_by_key_mut(key)
    };
    let entry = entry.ok_or_else(|| Inconsistency::UnknownEntry {
        key: key.to_string(),
        language: language.to_string(),
    })?;

    let outcome = entry.merge(language, value);
    if outcome == MergeOutcome::MarkedFuzzy {
        tracing::warn!(key, language = %language, "Remote edit conflicts with existing translation");
    }
    Ok(outcome)
}

/// Applies a batch of edits in order.
///
/// Every edit is checked against the index before any is applied, so an
/// unknown key aborts the batch without touching the index.
pub fn apply_edits(index: &mut TranslationIndex, edits: &[Edit]) -> Result<PassReport, Error> {
    for edit in edits {
        if index.get(&edit.key).is_none() && index.find_by_key(&edit.key).is_none() {
            return Err(Inconsistency::UnknownEntry {
                key: edit.key.clone(),
                language: edit.language.to_string(),
            }
            .into());
        }
    }

    let mut report = PassReport::default();
    for edit in edits {
        let outcome = apply_edit(index, &edit.key, &edit.language, &edit.value)?;
        report.record(outcome);
    }
    Ok(report)
}
