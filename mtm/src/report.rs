//! Counters and recoverable diagnostics collected while a pass runs.
//!
//! Fatal problems abort a pass with an [`Error`](crate::Error). Everything else
//! is recorded here so a single run surfaces all problems at once.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Recoverable issue found during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A translation references placeholder slots the resource key does not have.
    PlaceholderMismatch {
        key: String,
        language: String,
        missing_slots: Vec<usize>,
    },
    /// A record being written back has no entry in the index.
    UnindexedKey {
        key: String,
        language: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        path: Option<PathBuf>,
    },
    /// Several entries carry the key and none matches its default value; the
    /// first owner in canonical order was used.
    AmbiguousKey {
        key: String,
        language: String,
        owners: Vec<String>,
    },
    /// Plural records are kept in their files but not indexed.
    SkippedPlural {
        key: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        path: Option<PathBuf>,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::PlaceholderMismatch {
                key,
                language,
                missing_slots,
            } => write!(
                f,
                "placeholder mismatch for `{}` ({}): missing slot(s) {:?}",
                key, language, missing_slots
            ),
            Diagnostic::UnindexedKey { key, language, .. } => {
                write!(f, "`{}` ({}) is not in the index", key, language)
            }
            Diagnostic::AmbiguousKey { key, language, owners } => write!(
                f,
                "`{}` ({}) belongs to {} entries {:?}, used the first",
                key,
                language,
                owners.len(),
                owners
            ),
            Diagnostic::SkippedPlural { key, .. } => {
                write!(f, "plural `{}` is not indexed", key)
            }
        }
    }
}

/// Outcome of one build or edit-ingestion pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PassReport {
    pub entries_created: usize,
    pub keys_deduplicated: usize,
    pub translations_adopted: usize,
    pub conflicts_marked: usize,
    pub candidates_added: usize,
    pub unchanged: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl PassReport {
    pub(crate) fn record(&mut self, outcome: crate::merge::MergeOutcome) {
        use crate::merge::MergeOutcome;
        match outcome {
            MergeOutcome::Adopted => self.translations_adopted += 1,
            MergeOutcome::MarkedFuzzy => self.conflicts_marked += 1,
            MergeOutcome::CandidateAdded => self.candidates_added += 1,
            MergeOutcome::Unchanged => self.unchanged += 1,
        }
    }
}

/// Outcome of writing index values back into resource records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncReport {
    pub processed_files: usize,
    pub total_records: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped_untracked: usize,
    pub skipped_unindexed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl SyncReport {
    pub fn merge(&mut self, other: SyncReport) {
        self.processed_files += other.processed_files;
        self.total_records += other.total_records;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.skipped_untracked += other.skipped_untracked;
        self.skipped_unindexed += other.skipped_unindexed;
        self.diagnostics.extend(other.diagnostics);
    }
}
