use mtm::{Project, sheet};

use crate::report::print_pass_report;
use mtm_cli::validation::validate_file_path;

/// Ingests translations from a sheet exported as CSV.
///
/// The index is backed up first and only saved when every row applies.
pub fn run_pull_command(project: &Project, input: &str) -> Result<(), String> {
    validate_file_path(input)?;
    let mut index = project
        .load_index()
        .map_err(|e| format!("Failed to load index: {}", e))?;

    let rows = sheet::read_csv(input).map_err(|e| format!("Failed to read {}: {}", input, e))?;
    let report = sheet::pull_rows(&mut index, &rows).map_err(|e| format!("Failed to apply sheet: {}", e))?;

    let backup = project
        .backup_index()
        .map_err(|e| format!("Failed to back up index: {}", e))?;
    println!("Backed up index to {}", backup.display());
    project
        .save_index(&index)
        .map_err(|e| format!("Failed to write index: {}", e))?;

    print_pass_report(&report);
    if index.has_fuzzy() {
        println!("Conflicting translations found, run `mtm status` to list them");
    }
    Ok(())
}
