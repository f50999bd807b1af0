use mtm::Project;

/// Copies keys the translated files lack from their default files.
pub fn run_populate_command(project: &Project) -> Result<(), String> {
    let added = project
        .populate_missing_keys()
        .map_err(|e| format!("Failed to populate keys: {}", e))?;
    if added == 0 {
        println!("Every translated file already has every key");
    } else {
        println!("Added {} missing key(s)", added);
    }
    Ok(())
}
