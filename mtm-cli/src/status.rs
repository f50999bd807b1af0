use mtm::Project;
use serde_json::json;

/// Prints translation progress and every unresolved conflict.
pub fn run_status_command(project: &Project, json_output: bool) -> Result<(), String> {
    let index = project
        .load_index()
        .map_err(|e| format!("Failed to load index: {}", e))?;
    let stats = index.stats();
    let slots = index.fuzzy_slots();

    if json_output {
        let body = json!({
            "summary": {
                "entries": stats.entries,
                "keys": stats.keys,
                "fuzzy": slots.len(),
            },
            "languages": stats.languages,
            "fuzzy": slots,
        });
        let text = serde_json::to_string_pretty(&body)
            .map_err(|e| format!("Failed to serialize status: {}", e))?;
        println!("{}", text);
        return Ok(());
    }

    println!("=== Status ===");
    println!("Entries: {}", stats.entries);
    println!("Keys: {}", stats.keys);

    for (language, lang_stats) in &stats.languages {
        let total = lang_stats.translated + lang_stats.untranslated + lang_stats.fuzzy;
        let percent = if total == 0 {
            100.0
        } else {
            (lang_stats.translated as f64) * 100.0 / (total as f64)
        };
        println!("\nLanguage: {}", language);
        println!("  Translated: {}", lang_stats.translated);
        println!("  Untranslated: {}", lang_stats.untranslated);
        println!("  Fuzzy: {}", lang_stats.fuzzy);
        println!("  Completion: {:.2}%", percent);
    }

    if slots.is_empty() {
        println!("\nNo conflicts");
        return Ok(());
    }
    println!("\nConflicts ({}):", slots.len());
    for slot in &slots {
        println!("  \"{}\" [{}]", slot.value, slot.language);
        for candidate in &slot.candidates {
            println!("    - {}", candidate);
        }
    }
    Ok(())
}
