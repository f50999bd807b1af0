use std::collections::BTreeSet;

use mtm::fuzzy::{Fuzzy, is_fuzzy};
use mtm::placeholder::{extract, reinsert};
use mtm::traits::Parser;
use mtm::{GenericLanguage, Platform, ResourceFile, ResourceRecord, TranslationIndex, merge_translation};
use proptest::prelude::*;

fn text_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 ,\\.!\\?éü]{0,8}").expect("valid text regex")
}

fn specifier_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "%@", "%d", "%s", "%f", "%x", "%u", "%ld", "%lld", "%lu", "%1$@", "%2$s", "%3$ld", "%%",
    ])
    .prop_map(str::to_string)
}

/// Text and specifiers interleaved: `text (spec text)*`.
fn raw_value_strategy() -> impl Strategy<Value = String> {
    (
        text_strategy(),
        prop::collection::vec((specifier_strategy(), text_strategy()), 0..5),
    )
        .prop_map(|(head, rest)| {
            let mut raw = head;
            for (spec, text) in rest {
                raw.push_str(&spec);
                raw.push_str(&text);
            }
            raw
        })
}

fn translation_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["", "Hello", "Bonjour", "Salut", "Coucou", "Allô"]).prop_map(str::to_string)
}

fn key_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,10}").expect("valid key regex")
}

fn records_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map(key_strategy(), raw_value_strategy(), 1..8)
        .prop_map(|map| map.into_iter().collect())
}

fn build(records: &[(String, String)], french: &[(String, String)]) -> TranslationIndex {
    let known: BTreeSet<GenericLanguage> = [GenericLanguage::normalize("fr")].into_iter().collect();
    let defaults = vec![
        ResourceFile::new("values/strings.xml", Platform::Android, "", true).with_records(
            records
                .iter()
                .map(|(k, v)| ResourceRecord::simple(k.clone(), v.clone()))
                .collect(),
        ),
    ];
    let translations = vec![
        ResourceFile::new("values-fr/strings.xml", Platform::Android, "fr", false).with_records(
            french
                .iter()
                .map(|(k, v)| ResourceRecord::simple(k.clone(), v.clone()))
                .collect(),
        ),
    ];
    TranslationIndex::build(&defaults, &translations, &known)
        .expect("every french key has a default")
        .0
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn placeholder_round_trip_reproduces_raw(raw in raw_value_strategy()) {
        let (canonical, placeholders) = extract(&raw);
        let reinserted = reinsert(&canonical, &placeholders);
        prop_assert!(reinserted.is_complete());
        prop_assert_eq!(reinserted.value, raw);
    }

    #[test]
    fn placeholder_slots_are_contiguous(raw in raw_value_strategy()) {
        let (_, placeholders) = extract(&raw);
        for (expected, slot) in placeholders.keys().enumerate() {
            prop_assert_eq!(expected, *slot);
        }
    }

    #[test]
    fn fuzzy_slot_never_resets(incoming in prop::collection::vec(translation_strategy(), 1..12)) {
        let mut slot = String::new();
        let mut seen_fuzzy = false;
        for value in &incoming {
            let before = Fuzzy::parse(&slot);
            merge_translation("Hello", &mut slot, value);
            if let Some(before) = before {
                seen_fuzzy = true;
                let after = Fuzzy::parse(&slot).expect("fuzzy slot stays fuzzy");
                // The candidate set only grows
                prop_assert!(before.candidates().iter().all(|c| after.contains(c)));
            }
            if seen_fuzzy {
                prop_assert!(is_fuzzy(&slot));
            }
        }
    }

    #[test]
    fn build_is_deterministic(records in records_strategy()) {
        let french: Vec<(String, String)> = records
            .iter()
            .step_by(2)
            .map(|(k, _)| (k.clone(), "Bonjour".to_string()))
            .collect();

        let mut first = Vec::new();
        build(&records, &french).to_writer(&mut first).expect("serialize");
        let mut second = Vec::new();
        build(&records, &french).to_writer(&mut second).expect("serialize");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn persisted_index_reloads_identically(records in records_strategy()) {
        let index = build(&records, &[]);
        let mut bytes = Vec::new();
        index.to_writer(&mut bytes).expect("serialize");
        let reloaded = TranslationIndex::from_bytes(&bytes).expect("reload");
        prop_assert_eq!(reloaded, index);
    }
}
