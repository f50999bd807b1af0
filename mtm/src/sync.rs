//! Writing index values back into resource records.
//!
//! A [`SyncWriter`] can only be created from an index without fuzzy slots:
//! unresolved conflicts block write-back for every record, not just the
//! affected entries.

use std::collections::BTreeMap;

use crate::{
    error::{Error, Inconsistency},
    index::{TranslationEntry, TranslationIndex},
    language::GenericLanguage,
    placeholder::{extract, reinsert},
    report::{Diagnostic, SyncReport},
    types::{ResourceFile, ResourceRecord},
};

/// What the index says a record's value should be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The record's value differs from the index and should become `value`.
    Updated {
        value: String,
        /// Slots the translation references that the key's placeholder map lacks.
        missing_slots: Vec<usize>,
    },
    /// The record already holds the resolved value.
    Unchanged { missing_slots: Vec<usize> },
    /// Untranslatable or plural records are left alone.
    Untracked,
    /// No entry carries the record's key.
    Unindexed,
}

impl Resolution {
    fn missing_slots(&self) -> &[usize] {
        match self {
            Resolution::Updated { missing_slots, .. } | Resolution::Unchanged { missing_slots } => {
                missing_slots
            }
            Resolution::Untracked | Resolution::Unindexed => &[],
        }
    }
}

/// Raw default-language value of each indexed record, by key.
pub type DefaultValues = BTreeMap<String, String>;

/// Collects the [`DefaultValues`] of a default-language file.
pub fn default_values(file: &ResourceFile) -> DefaultValues {
    file.indexed_records()
        .map(|record| (record.key.clone(), record.value.clone()))
        .collect()
}

/// Read access to an index that is ready for write-back.
#[derive(Debug, Clone, Copy)]
pub struct SyncWriter<'a> {
    index: &'a TranslationIndex,
}

impl<'a> SyncWriter<'a> {
    /// Fails with every fuzzy slot listed if the index has any.
    pub fn new(index: &'a TranslationIndex) -> Result<Self, Error> {
        let slots = index.fuzzy_slots();
        if !slots.is_empty() {
            return Err(Inconsistency::UnresolvedFuzzy { slots }.into());
        }
        Ok(Self { index })
    }

    /// Resolves the value `record` should have in `language`.
    ///
    /// An empty translation falls back to the canonical value. Placeholders are
    /// taken from the string key matching the record, since keys sharing one
    /// canonical value may use different specifiers.
    pub fn resolve(&self, language: &GenericLanguage, record: &ResourceRecord) -> Resolution {
        self.resolve_with_default(language, record, None)
    }

    /// Like [`resolve`](Self::resolve), with the record's value in its default
    /// file. When several entries carry the key, the one whose canonical value
    /// is the default value's owns the record.
    pub fn resolve_with_default(
        &self,
        language: &GenericLanguage,
        record: &ResourceRecord,
        default_value: Option<&str>,
    ) -> Resolution {
        if !record.is_indexed() {
            return Resolution::Untracked;
        }
        let owner = self
            .matching_owner(&record.key, default_value)
            .or_else(|| self.index.find_by_key(&record.key));
        let Some(entry) = owner else {
            return Resolution::Unindexed;
        };
        let Some(string_key) = entry.find_key(&record.key) else {
            return Resolution::Unindexed;
        };

        let template = match entry.translation(language.as_str()) {
            Some(translation) if !translation.is_empty() => translation,
            _ => entry.value.as_str(),
        };
        let reinserted = reinsert(template, &string_key.placeholder_map);

        if reinserted.value == record.value {
            Resolution::Unchanged {
                missing_slots: reinserted.missing_slots,
            }
        } else {
            Resolution::Updated {
                value: reinserted.value,
                missing_slots: reinserted.missing_slots,
            }
        }
    }

    fn matching_owner(&self, key: &str, default_value: Option<&str>) -> Option<&'a TranslationEntry> {
        let (canonical, _) = extract(default_value?);
        self.index.get(&canonical).filter(|entry| entry.has_key(key))
    }

    /// Updates `records` in place and reports what changed.
    pub fn sync_records(&self, language: &GenericLanguage, records: &mut [ResourceRecord]) -> SyncReport {
        let mut report = SyncReport::default();
        self.sync_into(language, records, None, None, &mut report);
        report
    }

    /// Updates every record of `file` in its own language.
    ///
    /// `defaults` holds the values of the file's default-language sibling and
    /// picks the owner of keys that several entries carry.
    pub fn sync_file(&self, file: &mut ResourceFile, defaults: Option<&DefaultValues>) -> SyncReport {
        let mut report = SyncReport {
            processed_files: 1,
            ..SyncReport::default()
        };
        let language = file.generic_language.clone();
        let path = file.path.clone();
        self.sync_into(&language, &mut file.records, defaults, Some(&path), &mut report);
        tracing::debug!(
            path = %path.display(),
            updated = report.updated,
            "Synced resource file"
        );
        report
    }

    fn sync_into(
        &self,
        language: &GenericLanguage,
        records: &mut [ResourceRecord],
        defaults: Option<&DefaultValues>,
        path: Option<&std::path::Path>,
        report: &mut SyncReport,
    ) {
        for record in records.iter_mut() {
            report.total_records += 1;
            let default_value = defaults
                .and_then(|defaults| defaults.get(&record.key))
                .map(String::as_str);

            if record.is_indexed() && self.matching_owner(&record.key, default_value).is_none() {
                let owners: Vec<String> = self
                    .index
                    .owners(&record.key)
                    .map(|entry| entry.value.clone())
                    .collect();
                if owners.len() > 1 {
                    tracing::warn!(key = %record.key, language = %language, "Key has several owners");
                    report.diagnostics.push(Diagnostic::AmbiguousKey {
                        key: record.key.clone(),
                        language: language.to_string(),
                        owners,
                    });
                }
            }

            let resolution = self.resolve_with_default(language, record, default_value);

            let missing_slots = resolution.missing_slots();
            if !missing_slots.is_empty() {
                tracing::warn!(key = %record.key, language = %language, "Placeholder mismatch");
                report.diagnostics.push(Diagnostic::PlaceholderMismatch {
                    key: record.key.clone(),
                    language: language.to_string(),
                    missing_slots: missing_slots.to_vec(),
                });
            }

            match resolution {
                Resolution::Updated { value, .. } => {
                    record.value = value;
                    report.updated += 1;
                }
                Resolution::Unchanged { .. } => report.unchanged += 1,
                Resolution::Untracked => report.skipped_untracked += 1,
                Resolution::Unindexed => {
                    report.skipped_unindexed += 1;
                    report.diagnostics.push(Diagnostic::UnindexedKey {
                        key: record.key.clone(),
                        language: language.to_string(),
                        path: path.map(std::path::Path::to_path_buf),
                    });
                }
            }
        }
    }
}

/// Resolves a single record, checking the fuzzy gate first.
pub fn resolve(
    index: &TranslationIndex,
    language: &GenericLanguage,
    record: &ResourceRecord,
) -> Result<Resolution, Error> {
    Ok(SyncWriter::new(index)?.resolve(language, record))
}
