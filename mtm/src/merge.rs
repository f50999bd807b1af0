//! The merge-conflict rule shared by the build pass and edit ingestion.

use crate::fuzzy::Fuzzy;

/// What the rule did to a translation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The incoming value became the slot's translation.
    Adopted,
    /// Two different translations collided; the slot is now fuzzy.
    MarkedFuzzy,
    /// The slot was already fuzzy and gained a new candidate.
    CandidateAdded,
    Unchanged,
}

impl MergeOutcome {
    pub fn is_change(self) -> bool {
        self != MergeOutcome::Unchanged
    }
}

/// Folds `incoming` into `slot`, the current translation of an entry whose
/// canonical value is `raw`.
///
/// An empty `incoming` means no translation was supplied and counts as `raw`.
/// A fuzzy slot only ever grows: it absorbs new candidates and is never reset
/// to a clean value here.
pub fn merge_translation(raw: &str, slot: &mut String, incoming: &str) -> MergeOutcome {
    let incoming = if incoming.is_empty() { raw } else { incoming };

    if let Some(mut fuzzy) = Fuzzy::parse(slot) {
        if fuzzy.absorb(incoming) {
            *slot = fuzzy.encode();
            return MergeOutcome::CandidateAdded;
        }
        return MergeOutcome::Unchanged;
    }

    // Identical to the default text: not translated yet
    if incoming == raw {
        if slot.is_empty() {
            *slot = incoming.to_string();
            return MergeOutcome::Adopted;
        }
        return MergeOutcome::Unchanged;
    }

    if slot.is_empty() || slot == raw {
        *slot = incoming.to_string();
        return MergeOutcome::Adopted;
    }

    if slot != incoming {
        *slot = Fuzzy::conflict(slot.as_str(), incoming).encode();
        return MergeOutcome::MarkedFuzzy;
    }

    MergeOutcome::Unchanged
}
