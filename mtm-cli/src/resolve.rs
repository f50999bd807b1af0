use mtm::Project;

use mtm_cli::validation::validate_language_code;

/// Settles one translation slot, usually a fuzzy one.
pub fn run_resolve_command(project: &Project, key: &str, lang: &str, value: &str) -> Result<(), String> {
    let language = validate_language_code(lang)?;
    let mut index = project
        .load_index()
        .map_err(|e| format!("Failed to load index: {}", e))?;

    // Accept an original resource key in place of the canonical value
    let canonical = match index.get(key) {
        Some(_) => key.to_string(),
        None => index
            .find_by_key(key)
            .map(|entry| entry.value.clone())
            .unwrap_or_else(|| key.to_string()),
    };
    let was_fuzzy = index
        .resolve_conflict(&canonical, &language, value)
        .map_err(|e| format!("Failed to resolve: {}", e))?;
    project
        .save_index(&index)
        .map_err(|e| format!("Failed to write index: {}", e))?;

    if was_fuzzy {
        println!("Resolved conflict for \"{}\" [{}]", canonical, language);
    } else {
        println!("Updated \"{}\" [{}]", canonical, language);
    }
    let remaining = index.fuzzy_slots().len();
    if remaining > 0 {
        println!("{} conflict(s) left", remaining);
    }
    Ok(())
}
