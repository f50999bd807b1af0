//! The canonical translation index.
//!
//! Every translatable simple string of the default-language files is stored
//! once, keyed by its canonical value (placeholders replaced by `{i}`). Each
//! entry remembers every resource key that carries that text together with the
//! key's own placeholder map, and holds one translation per generic language.
//!
//! The index is built in two explicit phases:
//!
//! 1. [`TranslationIndex::seed`] folds the default-language files in, creating
//!    entries or appending keys to existing ones.
//! 2. [`TranslationIndex::merge_file`] folds every translated file in, applying
//!    [`merge_translation`] to each slot.
//!
//! Entries are never removed. A rebuild starts from an empty index.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    io::{BufRead, Write},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Inconsistency},
    fuzzy::{Fuzzy, FuzzySlot, is_fuzzy},
    language::GenericLanguage,
    merge::{MergeOutcome, merge_translation},
    placeholder::PlaceholderMap,
    report::{Diagnostic, PassReport},
    traits::Parser,
    types::{ResourceFile, ResourceRecord, StringKind},
};

/// One resource key pointing at a canonical entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StringKey {
    /// Original resource key.
    pub key: String,
    /// Specifiers this key's raw value had, by slot.
    pub placeholder_map: PlaceholderMap,
}

impl StringKey {
    pub fn new(key: impl Into<String>, placeholder_map: PlaceholderMap) -> Self {
        Self {
            key: key.into(),
            placeholder_map,
        }
    }
}

/// Canonical unit of the index.
///
/// Fields are declared in alphabetical order so the persisted JSON is sorted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationEntry {
    pub keys: Vec<StringKey>,
    pub translatable: bool,
    pub translations: BTreeMap<GenericLanguage, String>,
    #[serde(rename = "type")]
    pub kind: StringKind,
    /// Canonical value; also the entry's key in the index.
    pub value: String,
}

impl TranslationEntry {
    pub fn new<'a>(
        value: impl Into<String>,
        key: StringKey,
        languages: impl IntoIterator<Item = &'a GenericLanguage>,
    ) -> Self {
        Self {
            keys: vec![key],
            translatable: true,
            translations: languages
                .into_iter()
                .map(|lang| (lang.clone(), String::new()))
                .collect(),
            kind: StringKind::Simple,
            value: value.into(),
        }
    }

    pub fn find_key(&self, original_key: &str) -> Option<&StringKey> {
        self.keys.iter().find(|k| k.key == original_key)
    }

    pub fn has_key(&self, original_key: &str) -> bool {
        self.find_key(original_key).is_some()
    }

    pub fn translation(&self, language: &str) -> Option<&str> {
        self.translations.get(language).map(String::as_str)
    }

    pub fn is_fuzzy(&self) -> bool {
        self.translations.values().any(|t| is_fuzzy(t))
    }

    /// Applies the merge-conflict rule to this entry's slot for `language`.
    /// A language the entry has never seen starts as an empty slot.
    pub fn merge(&mut self, language: &GenericLanguage, incoming: &str) -> MergeOutcome {
        let slot = self.translations.entry(language.clone()).or_default();
        merge_translation(&self.value, slot, incoming)
    }
}

/// Per-language translation progress.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LanguageStats {
    pub translated: usize,
    pub untranslated: usize,
    pub fuzzy: usize,
}

/// Summary of an index, used by status reporting.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct IndexStats {
    pub entries: usize,
    pub keys: usize,
    pub languages: BTreeMap<GenericLanguage, LanguageStats>,
}

/// Canonical value → entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TranslationIndex {
    entries: BTreeMap<String, TranslationEntry>,
}

impl TranslationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from scratch.
    ///
    /// `defaults` seed the entries, then every file of `translations` is merged
    /// in order. Any structural problem aborts the build and no index is
    /// returned.
    pub fn build(
        defaults: &[ResourceFile],
        translations: &[ResourceFile],
        known_languages: &BTreeSet<GenericLanguage>,
    ) -> Result<(Self, PassReport), Error> {
        let mut index = Self::new();
        let mut report = PassReport::default();

        for file in defaults {
            index.seed(file, known_languages, &mut report);
        }
        for file in translations {
            index.merge_file(file, &mut report)?;
        }

        tracing::debug!(
            entries = index.len(),
            conflicts = report.conflicts_marked,
            "Built translation index"
        );
        Ok((index, report))
    }

    /// Builds an index from a mixed list of files, split by their default flag.
    pub fn build_from_files(
        files: &[ResourceFile],
        known_languages: &BTreeSet<GenericLanguage>,
    ) -> Result<(Self, PassReport), Error> {
        let (defaults, translations): (Vec<ResourceFile>, Vec<ResourceFile>) =
            files.iter().cloned().partition(|f| f.is_default);
        Self::build(&defaults, &translations, known_languages)
    }

    /// Phase 1: folds the records of one default-language file into the index.
    pub fn seed(
        &mut self,
        file: &ResourceFile,
        known_languages: &BTreeSet<GenericLanguage>,
        report: &mut PassReport,
    ) {
        tracing::debug!(path = %file.path.display(), "Seeding from default file");
        for record in &file.records {
            if record.kind == StringKind::Plural && record.translatable {
                report.diagnostics.push(Diagnostic::SkippedPlural {
                    key: record.key.clone(),
                    path: Some(file.path.clone()),
                });
            }
        }
        self.seed_records(file.indexed_records(), known_languages, report);
    }

    /// Phase 1 over a bare record sequence.
    pub fn seed_records<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a ResourceRecord>,
        known_languages: &BTreeSet<GenericLanguage>,
        report: &mut PassReport,
    ) {
        for record in records.into_iter().filter(|r| r.is_indexed()) {
            let (canonical, placeholder_map) = record.canonical();
            let key = StringKey::new(record.key.clone(), placeholder_map);
            match self.entries.get_mut(&canonical) {
                Some(entry) => {
                    entry.keys.push(key);
                    report.keys_deduplicated += 1;
                }
                None => {
                    let entry = TranslationEntry::new(canonical.clone(), key, known_languages);
                    self.entries.insert(canonical, entry);
                    report.entries_created += 1;
                }
            }
        }
    }

    /// Phase 2: folds the records of one translated file into the index.
    ///
    /// Every key is checked before anything is written, so a file with a key
    /// the default files lack leaves the index untouched.
    pub fn merge_file(&mut self, file: &ResourceFile, report: &mut PassReport) -> Result<(), Error> {
        tracing::debug!(
            path = %file.path.display(),
            language = %file.generic_language,
            "Merging translated file"
        );
        let owners = self.key_owners();

        for record in file.indexed_records() {
            if !owners.contains_key(record.key.as_str()) {
                return Err(Inconsistency::OrphanKey {
                    key: record.key.clone(),
                    language: file.language.clone(),
                    path: file.path.clone(),
                }
                .into());
            }
        }

        for record in file.indexed_records() {
            let (incoming, _) = record.canonical();
            let Some(canonicals) = owners.get(record.key.as_str()) else {
                continue;
            };
            for canonical in canonicals {
                let Some(entry) = self.entries.get_mut(canonical) else {
                    continue;
                };
                let outcome = entry.merge(&file.generic_language, &incoming);
                if outcome == MergeOutcome::MarkedFuzzy {
                    tracing::warn!(
                        key = %record.key,
                        language = %file.generic_language,
                        path = %file.path.display(),
                        "Conflicting translation marked as fuzzy"
                    );
                }
                report.record(outcome);
            }
        }
        Ok(())
    }

    /// Original resource key → canonical values of every entry carrying it.
    fn key_owners(&self) -> HashMap<String, Vec<String>> {
        let mut owners: HashMap<String, Vec<String>> = HashMap::new();
        for (canonical, entry) in &self.entries {
            for key in &entry.keys {
                let canonicals = owners.entry(key.key.clone()).or_default();
                if !canonicals.contains(canonical) {
                    canonicals.push(canonical.clone());
                }
            }
        }
        owners
    }

    /// Adds an empty slot for every language an entry is missing.
    pub fn ensure_languages(&mut self, known_languages: &BTreeSet<GenericLanguage>) {
        for entry in self.entries.values_mut() {
            for language in known_languages {
                entry.translations.entry(language.clone()).or_default();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, canonical: &str) -> Option<&TranslationEntry> {
        self.entries.get(canonical)
    }

    pub fn get_mut(&mut self, canonical: &str) -> Option<&mut TranslationEntry> {
        self.entries.get_mut(canonical)
    }

    /// Entries in canonical-value order.
    pub fn entries(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.entries.values()
    }

    /// First entry (in canonical order) that carries `original_key`.
    pub fn find_by_key(&self, original_key: &str) -> Option<&TranslationEntry> {
        self.entries.values().find(|e| e.has_key(original_key))
    }

    /// Every entry carrying `original_key`, in canonical order.
    pub fn owners(&self, original_key: &str) -> impl Iterator<Item = &TranslationEntry> {
        self.entries.values().filter(move |e| e.has_key(original_key))
    }

    pub fn find_by_key_mut(&mut self, original_key: &str) -> Option<&mut TranslationEntry> {
        self.entries.values_mut().find(|e| e.has_key(original_key))
    }

    pub fn has_fuzzy(&self) -> bool {
        self.entries.values().any(TranslationEntry::is_fuzzy)
    }

    /// Every fuzzy slot in the index, in canonical then language order.
    pub fn fuzzy_slots(&self) -> Vec<FuzzySlot> {
        self.entries
            .values()
            .flat_map(|entry| {
                entry.translations.iter().filter_map(|(language, value)| {
                    Fuzzy::parse(value).map(|fuzzy| FuzzySlot {
                        value: entry.value.clone(),
                        language: language.to_string(),
                        candidates: fuzzy.candidates().to_vec(),
                    })
                })
            })
            .collect()
    }

    /// Replaces the translation of `canonical` in `language` with `chosen`.
    ///
    /// This is the only operation that turns a fuzzy slot back into a plain
    /// translation. An empty `chosen` resets the slot to the canonical value.
    /// Returns whether the slot was fuzzy.
    pub fn resolve_conflict(
        &mut self,
        canonical: &str,
        language: &GenericLanguage,
        chosen: &str,
    ) -> Result<bool, Error> {
        if is_fuzzy(chosen) {
            return Err(Error::invalid_index(format!(
                "resolved value for `{}` ({}) still carries the fuzzy marker",
                canonical, language
            )));
        }
        let entry = self
            .entries
            .get_mut(canonical)
            .ok_or_else(|| Inconsistency::UnknownEntry {
                key: canonical.to_string(),
                language: language.to_string(),
            })?;
        let chosen = if chosen.is_empty() {
            entry.value.clone()
        } else {
            chosen.to_string()
        };
        let previous = entry.translations.insert(language.clone(), chosen);
        Ok(previous.is_some_and(|p| is_fuzzy(&p)))
    }

    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            entries: self.entries.len(),
            ..IndexStats::default()
        };
        for entry in self.entries.values() {
            stats.keys += entry.keys.len();
            for (language, value) in &entry.translations {
                let lang_stats = stats.languages.entry(language.clone()).or_default();
                if is_fuzzy(value) {
                    lang_stats.fuzzy += 1;
                } else if value.is_empty() || *value == entry.value {
                    lang_stats.untranslated += 1;
                } else {
                    lang_stats.translated += 1;
                }
            }
        }
        stats
    }

    /// Checks the invariants a persisted index must satisfy.
    pub fn validate(&self) -> Result<(), Error> {
        for (canonical, entry) in &self.entries {
            if *canonical != entry.value {
                return Err(Error::invalid_index(format!(
                    "entry stored under `{}` has value `{}`",
                    canonical, entry.value
                )));
            }
            if entry.kind != StringKind::Simple {
                return Err(Error::invalid_index(format!(
                    "entry `{}` has type `{}`, only `{}` is indexed",
                    canonical,
                    entry.kind,
                    StringKind::Simple
                )));
            }
            if entry.keys.is_empty() {
                return Err(Error::invalid_index(format!(
                    "entry `{}` has no keys",
                    canonical
                )));
            }
            for key in &entry.keys {
                if key.key.is_empty() {
                    return Err(Error::invalid_index(format!(
                        "entry `{}` has an empty key",
                        canonical
                    )));
                }
                let contiguous = key
                    .placeholder_map
                    .keys()
                    .enumerate()
                    .all(|(expected, slot)| expected == *slot);
                if !contiguous {
                    return Err(Error::invalid_index(format!(
                        "key `{}` of `{}` has non-contiguous placeholder slots",
                        key.key, canonical
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Parser for TranslationIndex {
    /// Parses and validates a persisted index.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let document: serde_json::Value = serde_json::from_reader(reader)?;
        check_kind_tags(&document)?;
        let index: TranslationIndex = serde_json::from_value(document)?;
        index.validate()?;
        Ok(index)
    }

    /// Writes the index as pretty JSON with four-space indentation.
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
            self.serialize(&mut serializer)?;
        }
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Rejects an unknown `type` tag as [`Error::UnsupportedKind`] before serde
/// reports it as a generic parse error.
fn check_kind_tags(document: &serde_json::Value) -> Result<(), Error> {
    let Some(entries) = document.as_object() else {
        return Ok(());
    };
    for tag in entries
        .values()
        .filter_map(|entry| entry.get("type"))
        .filter_map(serde_json::Value::as_str)
    {
        tag.parse::<StringKind>()?;
    }
    Ok(())
}
