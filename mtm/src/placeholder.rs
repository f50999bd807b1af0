//! Placeholder extraction and reinsertion.
//!
//! Format specifiers differ between platforms (`%@` on iOS, `%1$s` on
//! Android), so the index stores values with every specifier replaced by a
//! positional token `{i}`. The literal specifier is remembered per resource key
//! and put back when the value is written to a resource file.
//!
//! Recognized specifiers:
//! - `%%`
//! - `%@`
//! - numbered forms `%1$@`, `%2$s`, `%3$ld`
//! - length-modified integers `%ld`, `%lld`, `%lu`, `%llx`, ...
//! - single-letter conversions `%d`, `%s`, `%f`, ...

use std::collections::BTreeMap;

/// Slot index → literal specifier, in encounter order.
pub type PlaceholderMap = BTreeMap<usize, String>;

const CONVERSIONS: &[u8] = b"diuoxXfFeEgGcCsSpaA";
const INTEGER_CONVERSIONS: &[u8] = b"diuoxX";

/// Replaces every recognized specifier in `raw` with `{i}`.
///
/// Returns the canonical value and the literal removed at each slot. Text
/// between specifiers is copied untouched and replacement tokens are never
/// scanned again.
pub fn extract(raw: &str) -> (String, PlaceholderMap) {
    let bytes = raw.as_bytes();
    let mut canonical = String::with_capacity(raw.len());
    let mut placeholders = PlaceholderMap::new();
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        let Some(end) = specifier_end(bytes, i) else {
            i += 1;
            continue;
        };

        // '%' and every specifier byte are ASCII, so these are char boundaries
        canonical.push_str(&raw[copied..i]);
        let slot = placeholders.len();
        canonical.push_str(&token(slot));
        placeholders.insert(slot, raw[i..end].to_string());
        copied = end;
        i = end;
    }
    canonical.push_str(&raw[copied..]);

    (canonical, placeholders)
}

/// Returns the end (exclusive) of a specifier starting at `start`.
fn specifier_end(bytes: &[u8], start: usize) -> Option<usize> {
    let next = *bytes.get(start + 1)?;
    match next {
        b'%' | b'@' => return Some(start + 2),
        _ => {}
    }

    // Numbered form: digits followed by '$'
    let mut j = start + 1;
    while j < bytes.len() && bytes[j].is_ascii_digit() {
        j += 1;
    }
    if j > start + 1 {
        if bytes.get(j) != Some(&b'$') {
            return None;
        }
        j += 1;
        if bytes.get(j) == Some(&b'@') {
            return Some(j + 1);
        }
        return conversion_end(bytes, j, CONVERSIONS);
    }

    if next == b'l' {
        return conversion_end(bytes, start + 1, INTEGER_CONVERSIONS);
    }

    CONVERSIONS.contains(&next).then_some(start + 2)
}

/// Optional `l`/`ll` length modifier followed by one of `allowed`.
fn conversion_end(bytes: &[u8], mut j: usize, allowed: &[u8]) -> Option<usize> {
    let mut length = 0;
    while length < 2 && bytes.get(j) == Some(&b'l') {
        j += 1;
        length += 1;
    }
    let ty = *bytes.get(j)?;
    let allowed = if length > 0 { INTEGER_CONVERSIONS } else { allowed };
    allowed.contains(&ty).then_some(j + 1)
}

fn token(slot: usize) -> String {
    format!("{{{}}}", slot)
}

/// Result of putting placeholders back into a canonical or translated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reinserted {
    /// Value with every known slot substituted.
    pub value: String,
    /// Slots referenced by the template but absent from the placeholder map.
    /// Their tokens are left in `value` as-is.
    pub missing_slots: Vec<usize>,
}

impl Reinserted {
    pub fn is_complete(&self) -> bool {
        self.missing_slots.is_empty()
    }
}

/// Replaces every `{i}` token in `template` with `placeholders[i]`.
///
/// Substitution is a single left-to-right pass, so the order of slots does
/// not matter and inserted literals are never rescanned.
pub fn reinsert(template: &str, placeholders: &PlaceholderMap) -> Reinserted {
    let bytes = template.as_bytes();
    let mut value = String::with_capacity(template.len());
    let mut missing_slots = Vec::new();
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'{' {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j == i + 1 || bytes.get(j) != Some(&b'}') {
            i += 1;
            continue;
        }
        let Ok(slot) = template[i + 1..j].parse::<usize>() else {
            i += 1;
            continue;
        };

        match placeholders.get(&slot) {
            Some(literal) => {
                value.push_str(&template[copied..i]);
                value.push_str(literal);
                copied = j + 1;
            }
            None => {
                if !missing_slots.contains(&slot) {
                    missing_slots.push(slot);
                }
            }
        }
        i = j + 1;
    }
    value.push_str(&template[copied..]);

    Reinserted {
        value,
        missing_slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(items: &[(usize, &str)]) -> PlaceholderMap {
        items.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_extract_ios_and_android() {
        let (canonical, placeholders) = extract("Hello %@, you have %d items");
        assert_eq!(canonical, "Hello {0}, you have {1} items");
        assert_eq!(placeholders, map(&[(0, "%@"), (1, "%d")]));
    }

    #[test]
    fn test_extract_numbered_forms() {
        let (canonical, placeholders) = extract("%2$s sent %1$@ %3$ld times");
        assert_eq!(canonical, "{0} sent {1} {2} times");
        assert_eq!(placeholders, map(&[(0, "%2$s"), (1, "%1$@"), (2, "%3$ld")]));
    }

    #[test]
    fn test_extract_length_modified_integers() {
        let (canonical, placeholders) = extract("%ld of %llu, %lx");
        assert_eq!(canonical, "{0} of {1}, {2}");
        assert_eq!(placeholders, map(&[(0, "%ld"), (1, "%llu"), (2, "%lx")]));
    }

    #[test]
    fn test_extract_escaped_percent_is_a_slot() {
        let (canonical, placeholders) = extract("50%% off, %d left");
        assert_eq!(canonical, "50{0} off, {1} left");
        assert_eq!(placeholders, map(&[(0, "%%"), (1, "%d")]));
    }

    #[test]
    fn test_extract_leaves_unrecognized_text() {
        let (canonical, placeholders) = extract("100% sure, %z and %1 and %lf");
        assert_eq!(canonical, "100% sure, %z and %1 and %lf");
        assert!(placeholders.is_empty());
    }

    #[test]
    fn test_extract_trailing_percent() {
        let (canonical, placeholders) = extract("Progress %");
        assert_eq!(canonical, "Progress %");
        assert!(placeholders.is_empty());
    }

    #[test]
    fn test_extract_empty() {
        let (canonical, placeholders) = extract("");
        assert_eq!(canonical, "");
        assert!(placeholders.is_empty());
    }

    #[test]
    fn test_extract_non_ascii_text() {
        let (canonical, placeholders) = extract("Café %@ — crème %d");
        assert_eq!(canonical, "Café {0} — crème {1}");
        assert_eq!(placeholders.len(), 2);
    }

    #[test]
    fn test_reinsert_round_trip() {
        let raw = "Hello %@, you have %d items";
        let (canonical, placeholders) = extract(raw);
        let reinserted = reinsert(&canonical, &placeholders);
        assert!(reinserted.is_complete());
        assert_eq!(reinserted.value, raw);
    }

    #[test]
    fn test_reinsert_translation_with_reordered_slots() {
        let placeholders = map(&[(0, "%1$@"), (1, "%2$d")]);
        let reinserted = reinsert("{1} éléments pour {0}", &placeholders);
        assert_eq!(reinserted.value, "%2$d éléments pour %1$@");
    }

    #[test]
    fn test_reinsert_missing_slot_is_reported() {
        let placeholders = map(&[(0, "%@")]);
        let reinserted = reinsert("{0} and {1} and {1}", &placeholders);
        assert_eq!(reinserted.value, "%@ and {1} and {1}");
        assert_eq!(reinserted.missing_slots, vec![1]);
        assert!(!reinserted.is_complete());
    }

    #[test]
    fn test_reinsert_ignores_non_tokens() {
        let placeholders = map(&[(0, "%d")]);
        let reinserted = reinsert("{name} {} {0}", &placeholders);
        assert_eq!(reinserted.value, "{name} {} %d");
        assert!(reinserted.is_complete());
    }
}
