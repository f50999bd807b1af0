use mtm::Project;

use crate::report::print_sync_report;

/// Writes the index back into the translated resource files.
pub fn run_save_command(project: &Project) -> Result<(), String> {
    let index = project
        .load_index()
        .map_err(|e| format!("Failed to load index: {}", e))?;
    let report = project.write_back(&index).map_err(|e| {
        if e.is_structural() {
            format!("You must resolve fuzzy translations before saving: {}", e)
        } else {
            format!("Failed to write resource files: {}", e)
        }
    })?;
    print_sync_report(&report);
    Ok(())
}
