use mtm::{GenericLanguage, Project, sheet};

use mtm_cli::validation::{validate_language_codes, validate_output_path};

/// Exports the index as sheet rows in CSV.
///
/// Without `--lang`, every configured language except the defaults is exported.
pub fn run_push_command(project: &Project, output: &str, langs: &[String]) -> Result<(), String> {
    validate_output_path(output)?;
    let languages: Vec<GenericLanguage> = if langs.is_empty() {
        project.config.translated_languages().into_iter().collect()
    } else {
        validate_language_codes(langs)?
    };

    let index = project
        .load_index()
        .map_err(|e| format!("Failed to load index: {}", e))?;
    let rows = sheet::push_rows(&index, &languages, &project.config.default_label);
    sheet::write_csv(output, &rows).map_err(|e| format!("Failed to write {}: {}", output, e))?;

    let labels: Vec<String> = languages.iter().map(GenericLanguage::to_string).collect();
    println!(
        "Wrote {} rows ({}) to {}",
        rows.len().saturating_sub(1),
        labels.join(", "),
        output
    );
    Ok(())
}
