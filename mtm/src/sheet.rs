//! Exchange of translations with a shared sheet.
//!
//! The sheet has a header row `[default_label, lang1, lang2, ...]` followed
//! by one row per index entry: the canonical value, then its translation in
//! each header language. A cell is left empty when the translation is the
//! canonical value itself, so translators only see what still needs work.

use std::{
    io::{Read, Write},
    path::Path,
};

use crate::{
    edit::{Edit, apply_edits},
    error::Error,
    index::TranslationIndex,
    language::GenericLanguage,
    report::PassReport,
};

pub type Row = Vec<String>;

/// Flattens the index into sheet rows for `languages`.
pub fn push_rows(index: &TranslationIndex, languages: &[GenericLanguage], default_label: &str) -> Vec<Row> {
    let mut rows = Vec::with_capacity(index.len() + 1);

    let mut header = Vec::with_capacity(languages.len() + 1);
    header.push(default_label.to_string());
    header.extend(languages.iter().map(GenericLanguage::to_string));
    rows.push(header);

    for entry in index.entries() {
        let mut row = Vec::with_capacity(languages.len() + 1);
        row.push(entry.value.clone());
        for language in languages {
            let cell = match entry.translation(language.as_str()) {
                Some(translation) if translation != entry.value => translation.to_string(),
                _ => String::new(),
            };
            row.push(cell);
        }
        rows.push(row);
    }
    rows
}

/// Turns pulled rows into edits.
///
/// The first column holds the canonical value and is never applied as a
/// translation. Empty cells carry no edit.
pub fn rows_to_edits(rows: &[Row]) -> Result<Vec<Edit>, Error> {
    let Some((header, body)) = rows.split_first() else {
        return Ok(Vec::new());
    };
    if header.is_empty() {
        return Err(Error::InvalidResource("sheet header row is empty".to_string()));
    }
    let languages: Vec<GenericLanguage> = header
        .iter()
        .skip(1)
        .map(|label| GenericLanguage::normalize(label))
        .collect();
    if let Some(position) = languages.iter().position(GenericLanguage::is_empty) {
        return Err(Error::InvalidResource(format!(
            "sheet header column {} has no language",
            position + 2
        )));
    }

    let mut edits = Vec::new();
    for row in body {
        let Some((canonical, cells)) = row.split_first() else {
            continue;
        };
        if canonical.is_empty() {
            continue;
        }
        for (language, cell) in languages.iter().zip(cells) {
            if !cell.is_empty() {
                edits.push(Edit::new(canonical.clone(), language.clone(), cell.clone()));
            }
        }
    }
    Ok(edits)
}

/// Ingests pulled rows through the edit path.
pub fn pull_rows(index: &mut TranslationIndex, rows: &[Row]) -> Result<PassReport, Error> {
    let edits = rows_to_edits(rows)?;
    tracing::debug!(edits = edits.len(), "Applying sheet edits");
    apply_edits(index, &edits)
}

pub fn write_rows<W: Write>(writer: W, rows: &[Row]) -> Result<(), Error> {
    let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    for row in rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn read_rows<R: Read>(reader: R) -> Result<Vec<Row>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

pub fn write_csv<P: AsRef<Path>>(path: P, rows: &[Row]) -> Result<(), Error> {
    let file = std::fs::File::create(path)?;
    write_rows(std::io::BufWriter::new(file), rows)
}

pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Row>, Error> {
    let file = std::fs::File::open(path)?;
    read_rows(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::types::{Platform, ResourceFile, ResourceRecord};

    fn langs(tags: &[&str]) -> Vec<GenericLanguage> {
        tags.iter().map(|t| GenericLanguage::normalize(t)).collect()
    }

    fn sample_index() -> TranslationIndex {
        let known: BTreeSet<GenericLanguage> = langs(&["fr", "de"]).into_iter().collect();
        let defaults = vec![
            ResourceFile::new("values/strings.xml", Platform::Android, "", true).with_records(vec![
                ResourceRecord::simple("hello", "Hello"),
                ResourceRecord::simple("bye", "Goodbye"),
            ]),
        ];
        let translations = vec![
            ResourceFile::new("values-fr/strings.xml", Platform::Android, "fr", false).with_records(vec![
                ResourceRecord::simple("hello", "Bonjour"),
                ResourceRecord::simple("bye", "Goodbye"),
            ]),
        ];
        TranslationIndex::build(&defaults, &translations, &known).unwrap().0
    }

    #[test]
    fn test_push_rows_blank_untranslated_cells() {
        let rows = push_rows(&sample_index(), &langs(&["fr", "de"]), "en");
        assert_eq!(rows[0], vec!["en", "fr", "de"]);
        assert_eq!(rows.len(), 3);
        // Entries come in canonical order
        assert_eq!(rows[1], vec!["Goodbye", "", ""]);
        assert_eq!(rows[2], vec!["Hello", "Bonjour", ""]);
    }

    #[test]
    fn test_pull_rows_applies_cells() {
        let mut index = sample_index();
        let rows = vec![
            vec!["en".to_string(), "fr".to_string(), "de".to_string()],
            vec!["Hello".to_string(), String::new(), "Hallo".to_string()],
            vec!["Goodbye".to_string(), "Au revoir".to_string(), String::new()],
        ];
        let report = pull_rows(&mut index, &rows).unwrap();
        assert_eq!(report.translations_adopted, 2);
        assert_eq!(index.get("Hello").unwrap().translation("de"), Some("Hallo"));
        assert_eq!(index.get("Hello").unwrap().translation("fr"), Some("Bonjour"));
        assert_eq!(index.get("Goodbye").unwrap().translation("fr"), Some("Au revoir"));
    }

    #[test]
    fn test_pull_rows_conflict_marks_fuzzy() {
        let mut index = sample_index();
        let rows = vec![
            vec!["en".to_string(), "fr".to_string()],
            vec!["Hello".to_string(), "Salut".to_string()],
        ];
        let report = pull_rows(&mut index, &rows).unwrap();
        assert_eq!(report.conflicts_marked, 1);
        assert!(index.has_fuzzy());
    }

    #[test]
    fn test_pull_rows_unknown_entry_fails() {
        let mut index = sample_index();
        let before = index.clone();
        let rows = vec![
            vec!["en".to_string(), "fr".to_string()],
            vec!["Hello".to_string(), "Salut".to_string()],
            vec!["Missing".to_string(), "Manquant".to_string()],
        ];
        let err = pull_rows(&mut index, &rows).unwrap_err();
        assert!(err.is_structural());
        assert_eq!(index, before);
    }

    #[test]
    fn test_rows_to_edits_normalizes_header() {
        let rows = vec![
            vec!["en".to_string(), "pt-rBR".to_string()],
            vec!["Hello".to_string(), "Olá".to_string()],
            vec![String::new(), "ignored".to_string()],
        ];
        let edits = rows_to_edits(&rows).unwrap();
        assert_eq!(edits, vec![Edit::new("Hello", "pt_BR", "Olá")]);
    }

    #[test]
    fn test_rows_to_edits_rejects_blank_language() {
        let rows = vec![vec!["en".to_string(), String::new()]];
        assert!(rows_to_edits(&rows).is_err());
        assert!(rows_to_edits(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_csv_round_trip_keeps_commas_and_quotes() {
        let rows = vec![
            vec!["en".to_string(), "fr".to_string()],
            vec!["Hello, \"you\"".to_string(), "Salut, \"toi\"".to_string()],
        ];
        let mut out = Vec::new();
        write_rows(&mut out, &rows).unwrap();
        assert_eq!(read_rows(out.as_slice()).unwrap(), rows);
    }
}
