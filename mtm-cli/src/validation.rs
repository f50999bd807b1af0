use std::path::Path;

use mtm::GenericLanguage;

/// Validate file path exists and is readable
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("File does not exist: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    Ok(())
}

/// Validate output directory exists or can be created
pub fn validate_output_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if let Some(parent) = path_obj.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                return Err(format!("Cannot create output directory: {}", e));
            }
        }
    }

    Ok(())
}

/// Validate a language code and return its generic form.
///
/// Android (`pt-rBR`), iOS (`pt-BR`) and generic (`pt_BR`) spellings are all
/// accepted.
pub fn validate_language_code(lang: &str) -> Result<GenericLanguage, String> {
    if lang.trim().is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    let generic = GenericLanguage::normalize(lang);
    match generic.language_identifier() {
        Some(_) => Ok(generic),
        None => Err(format!(
            "Invalid language code format: {}. Expected a BCP 47 language identifier",
            lang
        )),
    }
}

/// Validate every `--lang` value and keep the first occurrence of each.
pub fn validate_language_codes(langs: &[String]) -> Result<Vec<GenericLanguage>, String> {
    let mut out: Vec<GenericLanguage> = Vec::with_capacity(langs.len());
    for lang in langs {
        let generic = validate_language_code(lang)?;
        if !out.contains(&generic) {
            out.push(generic);
        }
    }
    Ok(out)
}
