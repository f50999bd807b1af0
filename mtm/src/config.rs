//! Project configuration.
//!
//! A project lists one or more applications (an Android module or an iOS
//! target), where their resource directories live and which languages they
//! ship. The config is read from JSON or, when the file ends in `.toml`, TOML.
//!
//! Relative paths are resolved against the directory holding the config file.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{error::Error, language::GenericLanguage, types::Platform};

pub const DEFAULT_CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_INDEX_FILENAME: &str = "strings_index.json";
pub const DEFAULT_LABEL: &str = "en";

fn default_index_filename() -> PathBuf {
    PathBuf::from(DEFAULT_INDEX_FILENAME)
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Where the persisted index lives.
    #[serde(default = "default_index_filename")]
    pub string_index_filename: PathBuf,

    /// Header of the canonical column in exchanged sheets.
    #[serde(default = "default_label")]
    pub default_label: String,

    pub applications: Vec<Application>,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Application {
    pub platform: Platform,
    pub project_dir: PathBuf,
    /// Resource directories relative to `project_dir` (`app/src/main/res/values`, `Resources`).
    pub string_dirs: Vec<String>,
    /// Platform language tags, the default language included.
    pub languages: Vec<String>,
    /// Language of the default resource files; empty for Android's `values`.
    #[serde(default)]
    pub default_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strings_filename: Option<String>,
}

/// One resource file a project expects, whether or not it exists yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocation {
    pub path: PathBuf,
    pub platform: Platform,
    pub language: String,
    pub is_default: bool,
    /// The configured directory this file belongs to.
    pub string_dir: String,
}

impl Application {
    pub fn strings_filename(&self) -> &str {
        match &self.strings_filename {
            Some(name) => name,
            None => match self.platform {
                Platform::Android => "strings.xml",
                Platform::Ios => "Localizable.strings",
            },
        }
    }

    /// Expected resource files, one per string directory and language.
    ///
    /// Android: `{project_dir}/{dir}-{lang}/{file}`, or `{dir}/{file}` for the
    /// empty language. iOS: `{project_dir}/{dir}/{lang}.lproj/{file}`.
    pub fn resource_locations(&self, base_dir: &Path) -> Vec<ResourceLocation> {
        let project_dir = base_dir.join(&self.project_dir);
        let filename = self.strings_filename();
        let mut locations = Vec::with_capacity(self.string_dirs.len() * self.languages.len());

        for string_dir in &self.string_dirs {
            for language in &self.languages {
                let path = match self.platform {
                    Platform::Android if language.is_empty() => project_dir.join(string_dir).join(filename),
                    Platform::Android => project_dir.join(format!("{string_dir}-{language}")).join(filename),
                    Platform::Ios => project_dir
                        .join(string_dir)
                        .join(format!("{language}.lproj"))
                        .join(filename),
                };
                locations.push(ResourceLocation {
                    path,
                    platform: self.platform,
                    language: language.clone(),
                    is_default: *language == self.default_language,
                    string_dir: string_dir.clone(),
                });
            }
        }
        locations
    }

    fn validate(&self, position: usize) -> Result<(), Error> {
        if self.string_dirs.is_empty() {
            return Err(Error::config_error(format!(
                "application {position} has no string_dirs"
            )));
        }
        if !self.languages.contains(&self.default_language) {
            return Err(Error::config_error(format!(
                "application {position}: default language `{}` is not among its languages",
                self.default_language
            )));
        }
        if self.platform == Platform::Ios && self.languages.iter().any(String::is_empty) {
            return Err(Error::config_error(format!(
                "application {position}: iOS languages cannot be empty"
            )));
        }
        Ok(())
    }
}

impl ProjectConfig {
    /// Loads and validates a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading configuration");

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config_error(format!("cannot read {}: {e}", path.display())))?;
        let mut config = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml_str(&content)?,
            _ => Self::from_json_str(&content)?,
        };
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| Error::config_error(format!("invalid JSON config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::config_error(format!("invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.applications.is_empty() {
            return Err(Error::config_error("no applications configured"));
        }
        for (position, application) in self.applications.iter().enumerate() {
            application.validate(position)?;
        }
        Ok(())
    }

    pub fn index_path(&self) -> PathBuf {
        self.base_dir.join(&self.string_index_filename)
    }

    /// Every expected resource file across applications.
    pub fn resource_locations(&self) -> Vec<ResourceLocation> {
        self.applications
            .iter()
            .flat_map(|application| application.resource_locations(&self.base_dir))
            .collect()
    }

    /// Sorted set of generic languages across applications.
    ///
    /// Android's default `values` directory has no language and contributes
    /// no slot.
    pub fn known_languages(&self) -> BTreeSet<GenericLanguage> {
        self.applications
            .iter()
            .flat_map(|application| application.languages.iter())
            .map(|tag| GenericLanguage::normalize(tag))
            .filter(|language| !language.is_empty())
            .collect()
    }

    /// Known languages minus each application's default language.
    pub fn translated_languages(&self) -> BTreeSet<GenericLanguage> {
        self.applications
            .iter()
            .flat_map(|application| {
                application
                    .languages
                    .iter()
                    .filter(move |tag| **tag != application.default_language)
            })
            .map(|tag| GenericLanguage::normalize(tag))
            .filter(|language| !language.is_empty())
            .collect()
    }
}
