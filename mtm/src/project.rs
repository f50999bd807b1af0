//! A configured project on disk.
//!
//! [`Project`] ties the config to the engine: it finds and reads every
//! resource file, builds or loads the persisted index, and writes resolved
//! translations back into the translated files.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use rayon::prelude::*;

use crate::{
    config::{ProjectConfig, ResourceLocation},
    error::Error,
    formats::{read_resource_file, write_resource_file},
    index::TranslationIndex,
    report::{PassReport, SyncReport},
    sync::{DefaultValues, SyncWriter, default_values},
    traits::Parser,
    types::{ResourceFile, ResourceRecord},
};

#[derive(Debug, Clone)]
pub struct Project {
    pub config: ProjectConfig,
}

/// The files of one configured string directory.
#[derive(Debug, Clone)]
struct DirectoryGroup {
    default: Option<ResourceLocation>,
    translated: Vec<ResourceLocation>,
}

fn read_location(location: &ResourceLocation) -> Result<ResourceFile, Error> {
    read_resource_file(
        &location.path,
        location.platform,
        &location.language,
        location.is_default,
    )
}

impl Project {
    pub fn new(config: ProjectConfig) -> Self {
        Self { config }
    }

    pub fn open<P: AsRef<Path>>(config_path: P) -> Result<Self, Error> {
        Ok(Self::new(ProjectConfig::load(config_path)?))
    }

    pub fn index_path(&self) -> PathBuf {
        self.config.index_path()
    }

    /// Reads every expected resource file in parallel, in config order.
    pub fn read_resource_files(&self) -> Result<Vec<ResourceFile>, Error> {
        let locations = self.config.resource_locations();
        let files = locations
            .par_iter()
            .map(read_location)
            .collect::<Result<Vec<_>, Error>>()?;
        tracing::debug!(files = files.len(), "Read project resource files");
        Ok(files)
    }

    /// Builds a fresh index from the resource files.
    pub fn build_index(&self) -> Result<(TranslationIndex, PassReport), Error> {
        let files = self.read_resource_files()?;
        TranslationIndex::build_from_files(&files, &self.config.known_languages())
    }

    pub fn index_exists(&self) -> bool {
        self.index_path().exists()
    }

    /// Loads the persisted index, adding empty slots for languages configured
    /// since it was written.
    pub fn load_index(&self) -> Result<TranslationIndex, Error> {
        let path = self.index_path();
        if !path.exists() {
            return Err(Error::invalid_index(format!(
                "{} does not exist yet, build it first",
                path.display()
            )));
        }
        let mut index = TranslationIndex::read_from(&path)?;
        index.ensure_languages(&self.config.known_languages());
        Ok(index)
    }

    pub fn save_index(&self, index: &TranslationIndex) -> Result<(), Error> {
        let path = self.index_path();
        index.write_to(&path)?;
        tracing::debug!(path = %path.display(), entries = index.len(), "Saved index");
        Ok(())
    }

    /// Copies the persisted index to `<index>.<unix-seconds>.bak`.
    pub fn backup_index(&self) -> Result<PathBuf, Error> {
        let path = self.index_path();
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let mut backup = path.clone().into_os_string();
        backup.push(format!(".{seconds}.bak"));
        let backup = PathBuf::from(backup);
        fs::copy(&path, &backup)?;
        tracing::info!(backup = %backup.display(), "Backed up index");
        Ok(backup)
    }

    /// Writes the index back into every translated resource file.
    ///
    /// Fails before touching any file if the index has unresolved fuzzy slots.
    /// Every file is synced before the first one is written, and files whose
    /// records are already up to date are not rewritten.
    pub fn write_back(&self, index: &TranslationIndex) -> Result<SyncReport, Error> {
        let writer = SyncWriter::new(index)?;
        let synced = self
            .directory_groups()
            .par_iter()
            .map(|group| sync_group(&writer, group))
            .collect::<Result<Vec<_>, Error>>()?;

        let mut total = SyncReport::default();
        for (file, report) in synced.into_iter().flatten() {
            if report.updated > 0 {
                write_resource_file(&file)?;
                tracing::info!(
                    path = %file.path.display(),
                    updated = report.updated,
                    "Updated resource file"
                );
            }
            total.merge(report);
        }
        Ok(total)
    }

    fn directory_groups(&self) -> Vec<DirectoryGroup> {
        let mut groups = Vec::new();
        for application in &self.config.applications {
            let locations = application.resource_locations(&self.config.base_dir);
            for string_dir in &application.string_dirs {
                let (defaults, translated): (Vec<ResourceLocation>, Vec<ResourceLocation>) = locations
                    .iter()
                    .filter(|location| &location.string_dir == string_dir)
                    .cloned()
                    .partition(|location| location.is_default);
                groups.push(DirectoryGroup {
                    default: defaults.into_iter().next(),
                    translated,
                });
            }
        }
        groups
    }

    /// Copies default-file records missing from the translated files of the
    /// same directory, so every translated file carries every key.
    ///
    /// Returns the number of records added.
    pub fn populate_missing_keys(&self) -> Result<usize, Error> {
        let mut added = 0;
        for group in self.directory_groups() {
            let Some(default_location) = &group.default else {
                continue;
            };
            let default_file = read_location(default_location)?;

            for location in &group.translated {
                let mut file = read_location(location)?;
                let missing: Vec<ResourceRecord> = default_file
                    .indexed_records()
                    .filter(|record| file.find_record(&record.key).is_none())
                    .cloned()
                    .collect();
                if missing.is_empty() {
                    continue;
                }
                tracing::info!(
                    path = %file.path.display(),
                    keys = missing.len(),
                    "Adding missing keys"
                );
                added += missing.len();
                file.records.extend(missing);
                write_resource_file(&file)?;
            }
        }
        Ok(added)
    }
}

/// Reads and syncs the translated files of one directory without writing them.
fn sync_group(writer: &SyncWriter<'_>, group: &DirectoryGroup) -> Result<Vec<(ResourceFile, SyncReport)>, Error> {
    let defaults = match &group.default {
        Some(location) => default_values(&read_location(location)?),
        None => DefaultValues::new(),
    };
    group
        .translated
        .iter()
        .map(|location| {
            let mut file = read_location(location)?;
            let report = writer.sync_file(&mut file, Some(&defaults));
            Ok((file, report))
        })
        .collect()
}
