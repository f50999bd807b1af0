use mtm::Project;

use crate::report::print_pass_report;

/// Builds the index from the resource files and writes it.
pub fn run_init_command(project: &Project, force: bool) -> Result<(), String> {
    let path = project.index_path();
    if project.index_exists() && !force {
        return Err(format!(
            "The string index already exists: {}. Pass --force to overwrite it",
            path.display()
        ));
    }
    if project.index_exists() {
        println!("Overwriting {}", path.display());
    }

    let (index, report) = project
        .build_index()
        .map_err(|e| format!("Failed to build index: {}", e))?;
    project
        .save_index(&index)
        .map_err(|e| format!("Failed to write index: {}", e))?;

    println!("Wrote {} entries to {}", index.len(), path.display());
    print_pass_report(&report);
    if index.has_fuzzy() {
        println!("Conflicting translations found, run `mtm status` to list them");
    }
    Ok(())
}
