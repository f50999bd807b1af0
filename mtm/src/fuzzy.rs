//! Fuzzy-marked translations.
//!
//! When two different translations claim the same language slot, the slot is
//! rewritten as `~fuzzy; first|second|...`. The encoded form is stored verbatim
//! in the persisted index, so the marker and the `|` separator are part of the
//! file format. A fuzzy slot must be resolved before anything is written back.
//!
//! The format has no escape for `|`: a candidate containing it is stored as
//! separate candidates, one per piece.

use serde::{Deserialize, Serialize};

/// Prefix of a fuzzy-marked translation.
pub const FUZZY_MARKER: &str = "~fuzzy; ";

/// Separator between conflicting candidates.
pub const CANDIDATE_SEPARATOR: char = '|';

/// Whether a translation value carries the fuzzy marker.
pub fn is_fuzzy(value: &str) -> bool {
    value.contains(FUZZY_MARKER)
}

/// Decoded set of conflicting candidates, in the order they were seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fuzzy {
    candidates: Vec<String>,
}

impl Fuzzy {
    /// Starts a conflict between an accepted value and a newcomer.
    pub fn conflict(existing: &str, incoming: &str) -> Self {
        let mut fuzzy = Self {
            candidates: Vec::new(),
        };
        fuzzy.absorb(existing);
        fuzzy.absorb(incoming);
        fuzzy
    }

    /// Decodes a fuzzy-marked value; `None` when the marker is absent.
    pub fn parse(value: &str) -> Option<Self> {
        if !is_fuzzy(value) {
            return None;
        }
        let candidates = value
            .replace(FUZZY_MARKER, "")
            .split(CANDIDATE_SEPARATOR)
            .map(str::to_string)
            .collect();
        Some(Self { candidates })
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Whether every piece of `candidate` is already a candidate.
    pub fn contains(&self, candidate: &str) -> bool {
        candidate
            .split(CANDIDATE_SEPARATOR)
            .all(|piece| self.candidates.iter().any(|c| c == piece))
    }

    /// Adds the pieces of `candidate` that are new. Returns whether the set grew.
    pub fn absorb(&mut self, candidate: &str) -> bool {
        if candidate.contains(CANDIDATE_SEPARATOR) {
            tracing::warn!(candidate, "Fuzzy candidate contains `|` and is split");
        }
        let before = self.candidates.len();
        for piece in candidate.split(CANDIDATE_SEPARATOR) {
            if !self.candidates.iter().any(|c| c == piece) {
                self.candidates.push(piece.to_string());
            }
        }
        self.candidates.len() > before
    }

    pub fn encode(&self) -> String {
        let mut out = String::from(FUZZY_MARKER);
        out.push_str(&self.candidates.join(&CANDIDATE_SEPARATOR.to_string()));
        out
    }
}

/// A fuzzy translation slot somewhere in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzySlot {
    /// Canonical value of the owning entry.
    pub value: String,
    pub language: String,
    pub candidates: Vec<String>,
}
