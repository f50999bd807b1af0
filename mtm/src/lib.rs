#![forbid(unsafe_code)]
//! Mobile translation manager.
//!
//! Reconciles the string resources of Android and iOS apps into a single
//! canonical translation index, and writes edits made to that index back into
//! the resource files.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mtm::Project;
//!
//! let project = Project::open("config.json")?;
//! let (index, report) = project.build_index()?;
//! println!("{} entries, {} conflicts", index.len(), report.conflicts_marked);
//! project.save_index(&index)?;
//!
//! // Later, once every conflict is resolved
//! let index = project.load_index()?;
//! project.write_back(&index)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # How it works
//!
//! - Every printf-style specifier is replaced by a positional `{i}` token,
//!   so `Hello %@` (iOS) and `Hello %s` (Android) share one canonical value.
//! - Identical canonical values are stored once, with every resource key that
//!   carries them.
//! - Disagreeing translations never overwrite each other; the slot is marked
//!   fuzzy and lists every candidate until someone picks one.
//! - Write-back refuses to run while any slot is fuzzy.

pub mod config;
pub mod edit;
pub mod error;
pub mod formats;
pub mod fuzzy;
pub mod index;
pub mod language;
pub mod merge;
pub mod placeholder;
pub mod project;
pub mod report;
pub mod sheet;
pub mod sync;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    config::ProjectConfig,
    edit::{Edit, apply_edit, apply_edits},
    error::{Error, Inconsistency},
    fuzzy::{FUZZY_MARKER, FuzzySlot, is_fuzzy},
    index::{StringKey, TranslationEntry, TranslationIndex},
    language::GenericLanguage,
    merge::{MergeOutcome, merge_translation},
    placeholder::{PlaceholderMap, extract, reinsert},
    project::Project,
    report::{Diagnostic, PassReport, SyncReport},
    sync::{Resolution, SyncWriter},
    traits::Parser,
    types::{Platform, ResourceFile, ResourceRecord, StringKind},
};
