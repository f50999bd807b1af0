//! Resource file formats of the supported platforms.
//!
//! Android projects use `strings.xml`, iOS projects use `.strings`. Both are
//! read into and written from [`ResourceFile`]s.

pub mod android_strings;
pub mod strings;

use std::path::Path;

pub use android_strings::Format as AndroidStringsFormat;
pub use strings::Format as StringsFormat;

use crate::{
    error::Error,
    traits::Parser,
    types::{Platform, ResourceFile},
};

/// Infers the platform from a file path's extension.
///
/// # Example
/// ```rust
/// use mtm::formats::infer_platform_from_extension;
/// use mtm::types::Platform;
/// assert_eq!(infer_platform_from_extension("values/strings.xml"), Some(Platform::Android));
/// assert_eq!(infer_platform_from_extension("en.lproj/Localizable.strings"), Some(Platform::Ios));
/// assert_eq!(infer_platform_from_extension("foo.txt"), None);
/// ```
pub fn infer_platform_from_extension<P: AsRef<Path>>(path: P) -> Option<Platform> {
    match path.as_ref().extension().and_then(|s| s.to_str()) {
        Some("xml") => Some(Platform::Android),
        Some("strings") => Some(Platform::Ios),
        _ => None,
    }
}

/// Reads one resource file.
///
/// A file that does not exist yet reads as empty, since a newly added language
/// has no resources until the first write-back.
pub fn read_resource_file<P: AsRef<Path>>(
    path: P,
    platform: Platform,
    language: &str,
    is_default: bool,
) -> Result<ResourceFile, Error> {
    let path = path.as_ref();
    let file = ResourceFile::new(path, platform, language, is_default);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Resource file missing, treating as empty");
        return Ok(file);
    }

    let records = match platform {
        Platform::Android => AndroidStringsFormat::read_from(path).map(|format| format.records),
        Platform::Ios => StringsFormat::read_from(path).map(|format| format.records()),
    }
    .inspect_err(|e| tracing::error!(path = %path.display(), error = %e, "Failed to read resource file"))?;
    tracing::debug!(path = %path.display(), records = records.len(), "Read resource file");
    Ok(file.with_records(records))
}

/// Writes a resource file, replacing the previous content atomically.
pub fn write_resource_file(file: &ResourceFile) -> Result<(), Error> {
    match file.platform {
        Platform::Android => {
            AndroidStringsFormat::new(file.is_default, file.records.clone()).write_to(&file.path)?
        }
        Platform::Ios => StringsFormat::from_records(&file.records).write_to(&file.path)?,
    }
    tracing::debug!(path = %file.path.display(), "Wrote resource file");
    Ok(())
}
