use std::collections::BTreeSet;
use std::path::PathBuf;

use mtm::placeholder::{extract, reinsert};
use mtm::sync::{Resolution, resolve};
use mtm::traits::Parser;
use mtm::{
    Error, GenericLanguage, Inconsistency, Platform, ResourceFile, ResourceRecord, TranslationIndex,
    apply_edit,
};

fn fr() -> GenericLanguage {
    GenericLanguage::normalize("fr")
}

fn known() -> BTreeSet<GenericLanguage> {
    ["fr", "de"].iter().map(|t| GenericLanguage::normalize(t)).collect()
}

fn default_file(records: Vec<ResourceRecord>) -> ResourceFile {
    ResourceFile::new("en.lproj/Localizable.strings", Platform::Ios, "en", true).with_records(records)
}

fn french_file(path: &str, records: Vec<ResourceRecord>) -> ResourceFile {
    ResourceFile::new(path, Platform::Ios, "fr", false).with_records(records)
}

#[test]
fn translation_lands_in_generic_language_slot() {
    let defaults = vec![default_file(vec![ResourceRecord::simple("GREETING", "Hello")])];
    let translations = vec![french_file(
        "fr.lproj/Localizable.strings",
        vec![ResourceRecord::simple("GREETING", "Bonjour")],
    )];
    let (index, report) = TranslationIndex::build(&defaults, &translations, &known()).unwrap();

    let entry = index.get("Hello").unwrap();
    assert_eq!(entry.translation("fr"), Some("Bonjour"));
    assert_eq!(entry.translation("de"), Some(""));
    assert_eq!(report.translations_adopted, 1);
}

#[test]
fn conflicting_files_mark_fuzzy_and_block_write_back() {
    let defaults = vec![default_file(vec![
        ResourceRecord::simple("GREETING", "Hello"),
        ResourceRecord::simple("FAREWELL", "Goodbye"),
    ])];
    let translations = vec![
        french_file("App/fr.lproj/Localizable.strings", vec![ResourceRecord::simple("GREETING", "Bonjour")]),
        french_file("Widget/fr.lproj/Localizable.strings", vec![ResourceRecord::simple("GREETING", "Salut")]),
    ];
    let (mut index, report) = TranslationIndex::build(&defaults, &translations, &known()).unwrap();

    assert_eq!(report.conflicts_marked, 1);
    assert_eq!(
        index.get("Hello").unwrap().translation("fr"),
        Some("~fuzzy; Bonjour|Salut")
    );

    // Blocked for an unrelated record too
    let unrelated = ResourceRecord::simple("FAREWELL", "Goodbye");
    match resolve(&index, &fr(), &unrelated) {
        Err(Error::StructuralInconsistency(Inconsistency::UnresolvedFuzzy { slots })) => {
            assert_eq!(slots.len(), 1);
            assert_eq!(slots[0].candidates, vec!["Bonjour", "Salut"]);
        }
        other => panic!("expected unresolved fuzzy, got {other:?}"),
    }

    assert!(index.resolve_conflict("Hello", &fr(), "Salut").unwrap());
    let greeting = ResourceRecord::simple("GREETING", "Bonjour");
    assert_eq!(
        resolve(&index, &fr(), &greeting).unwrap(),
        Resolution::Updated {
            value: "Salut".to_string(),
            missing_slots: vec![]
        }
    );
}

#[test]
fn placeholders_extract_and_reinsert() {
    let raw = "Hello %@, you have %d items";
    let (canonical, placeholders) = extract(raw);
    assert_eq!(canonical, "Hello {0}, you have {1} items");
    assert_eq!(placeholders.get(&0).map(String::as_str), Some("%@"));
    assert_eq!(placeholders.get(&1).map(String::as_str), Some("%d"));
    assert_eq!(placeholders.len(), 2);
    assert_eq!(reinsert(&canonical, &placeholders).value, raw);
}

#[test]
fn empty_remote_edit_reverts_to_canonical() {
    let defaults = vec![default_file(vec![ResourceRecord::simple("GREETING", "Hello")])];
    let (mut index, _) = TranslationIndex::build(&defaults, &[], &known()).unwrap();

    apply_edit(&mut index, "GREETING", &fr(), "").unwrap();
    assert_eq!(index.get("Hello").unwrap().translation("fr"), Some("Hello"));
}

#[test]
fn orphan_key_fails_build() {
    let defaults = vec![default_file(vec![ResourceRecord::simple("GREETING", "Hello")])];
    let translations = vec![french_file(
        "fr.lproj/Localizable.strings",
        vec![ResourceRecord::simple("ORPHAN", "Orphelin")],
    )];
    let err = TranslationIndex::build(&defaults, &translations, &known()).unwrap_err();
    match err {
        Error::StructuralInconsistency(Inconsistency::OrphanKey { key, language, path }) => {
            assert_eq!(key, "ORPHAN");
            assert_eq!(language, "fr");
            assert_eq!(path, PathBuf::from("fr.lproj/Localizable.strings"));
        }
        other => panic!("expected orphan key, got {other:?}"),
    }
}

#[test]
fn identical_values_share_one_entry() {
    let defaults = vec![default_file(vec![
        ResourceRecord::simple("OK_BUTTON", "OK"),
        ResourceRecord::simple("CONFIRM", "OK"),
    ])];
    let (index, report) = TranslationIndex::build(&defaults, &[], &known()).unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index.get("OK").unwrap().keys.len(), 2);
    assert_eq!(report.keys_deduplicated, 1);
}

#[test]
fn platforms_share_entries_across_specifier_styles() {
    let defaults = vec![
        ResourceFile::new("values/strings.xml", Platform::Android, "", true)
            .with_records(vec![ResourceRecord::simple("greeting", "Hello %s")]),
        default_file(vec![ResourceRecord::simple("GREETING", "Hello %@")]),
    ];
    let translations = vec![
        ResourceFile::new("values-pt-rBR/strings.xml", Platform::Android, "pt-rBR", false)
            .with_records(vec![ResourceRecord::simple("greeting", "Olá %s")]),
    ];
    let known: BTreeSet<GenericLanguage> = [GenericLanguage::normalize("pt-BR")].into_iter().collect();
    let (index, _) = TranslationIndex::build(&defaults, &translations, &known).unwrap();

    assert_eq!(index.len(), 1);
    let entry = index.get("Hello {0}").unwrap();
    assert_eq!(entry.translation("pt_BR"), Some("Olá {0}"));

    let ios = ResourceRecord::simple("GREETING", "Hello %@");
    assert_eq!(
        resolve(&index, &GenericLanguage::normalize("pt-BR"), &ios).unwrap(),
        Resolution::Updated {
            value: "Olá %@".to_string(),
            missing_slots: vec![]
        }
    );
}

#[test]
fn persisted_format_is_sorted_and_indented() {
    let defaults = vec![default_file(vec![ResourceRecord::simple("GREETING", "Hello %@")])];
    let translations = vec![french_file(
        "fr.lproj/Localizable.strings",
        vec![ResourceRecord::simple("GREETING", "Bonjour %@")],
    )];
    let (index, _) = TranslationIndex::build(&defaults, &translations, &known()).unwrap();

    let mut out = Vec::new();
    index.to_writer(&mut out).unwrap();
    let expected = r#"{
    "Hello {0}": {
        "keys": [
            {
                "key": "GREETING",
                "placeholder_map": {
                    "0": "%@"
                }
            }
        ],
        "translatable": true,
        "translations": {
            "de": "",
            "fr": "Bonjour {0}"
        },
        "type": "string",
        "value": "Hello {0}"
    }
}
"#;
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn loading_rejects_invalid_documents() {
    let unknown_field = r#"{"Hi": {"keys": [{"key": "HI", "placeholder_map": {}}],
        "translatable": true, "translations": {}, "type": "string", "value": "Hi", "extra": 1}}"#;
    assert!(matches!(TranslationIndex::from_str(unknown_field), Err(Error::Parse(_))));

    let mismatched = r#"{"Hi": {"keys": [{"key": "HI", "placeholder_map": {}}],
        "translatable": true, "translations": {}, "type": "string", "value": "Hello"}}"#;
    assert!(matches!(TranslationIndex::from_str(mismatched), Err(Error::InvalidIndex(_))));

    let no_keys = r#"{"Hi": {"keys": [], "translatable": true, "translations": {},
        "type": "string", "value": "Hi"}}"#;
    assert!(matches!(TranslationIndex::from_str(no_keys), Err(Error::InvalidIndex(_))));
}
