use mtm::{Diagnostic, PassReport, SyncReport};

pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    println!("Diagnostics ({}):", diagnostics.len());
    for diagnostic in diagnostics {
        println!("  - {}", diagnostic);
    }
}

pub fn print_pass_report(report: &PassReport) {
    println!("Entries created: {}", report.entries_created);
    println!("Keys deduplicated: {}", report.keys_deduplicated);
    println!("Translations adopted: {}", report.translations_adopted);
    println!("Conflicts marked fuzzy: {}", report.conflicts_marked);
    println!("Candidates added: {}", report.candidates_added);
    println!("Unchanged: {}", report.unchanged);
    print_diagnostics(&report.diagnostics);
}

pub fn print_sync_report(report: &SyncReport) {
    println!("Files processed: {}", report.processed_files);
    println!("Records: {}", report.total_records);
    println!("Updated: {}", report.updated);
    println!("Unchanged: {}", report.unchanged);
    println!("Skipped (untracked): {}", report.skipped_untracked);
    println!("Skipped (not indexed): {}", report.skipped_unindexed);
    print_diagnostics(&report.diagnostics);
}
