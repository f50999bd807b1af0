//! Support for Apple `.strings` localization files.
//!
//! Values are kept in their escaped on-disk form, so a file read and written
//! back without edits keeps its escapes intact.

use std::fs::File;
use std::io::{BufRead, Read, Write};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{error::Error, traits::Parser, types::ResourceRecord};

/// Comment written above pairs that carry none.
pub const DEFAULT_COMMENT: &str = "/* No comment provided by engineer. */";

lazy_static! {
    static ref PAIR_LINE: Regex = Regex::new(r#"^"(.*)"\s*=\s*"(.*)"\s*;\s*$"#).unwrap();
}

/// A single key-value pair in a `.strings` file with the comment lines above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub key: String,
    pub value: String,
    /// Comment lines including their markers, in file order.
    pub comments: Vec<String>,
}

impl Pair {
    pub fn to_record(&self) -> ResourceRecord {
        let mut record = ResourceRecord::simple(self.key.clone(), self.value.clone());
        record.comments = self.comments.clone();
        record
    }
}

impl From<&ResourceRecord> for Pair {
    fn from(record: &ResourceRecord) -> Self {
        Pair {
            key: record.key.clone(),
            value: record.value.clone(),
            comments: record.comments.clone(),
        }
    }
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.comments.is_empty() {
            writeln!(f, "{DEFAULT_COMMENT}")?;
        } else {
            for comment in &self.comments {
                writeln!(f, "{comment}")?;
            }
        }
        // Empty values are written as the key
        let value = if self.value.is_empty() {
            &self.key
        } else {
            &self.value
        };
        writeln!(f, "\"{}\" = \"{}\";", self.key, value)
    }
}

/// An Apple `.strings` file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub pairs: Vec<Pair>,
}

impl Format {
    pub fn from_records(records: &[ResourceRecord]) -> Self {
        Format {
            pairs: records.iter().map(Pair::from).collect(),
        }
    }

    pub fn records(&self) -> Vec<ResourceRecord> {
        self.pairs.iter().map(Pair::to_record).collect()
    }

    /// Joins values spanning several lines into one line with `\n` escapes.
    pub fn multiline_values_to_one_line(content: &mut String) {
        let orig = std::mem::take(content);
        let mut result = String::with_capacity(orig.len());

        let mut chars = orig.chars().peekable();
        let mut inside_value = false;
        let mut value_buf = String::new();

        while let Some(c) = chars.next() {
            if !inside_value {
                result.push(c);
                if c == '=' {
                    // Seek first quote after '='
                    while let Some(&d) = chars.peek() {
                        result.push(d);
                        chars.next();
                        if d == '"' {
                            inside_value = true;
                            value_buf.clear();
                            break;
                        }
                    }
                }
            } else if c == '"' {
                let prev_backslashes = value_buf.chars().rev().take_while(|&x| x == '\\').count();
                if prev_backslashes % 2 == 0 {
                    inside_value = false;
                    let value_one_line = value_buf
                        .lines()
                        .map(str::trim_start)
                        .collect::<Vec<_>>()
                        .join(r"\n");
                    result.push_str(&value_one_line);
                    result.push('"');
                    value_buf.clear();
                } else {
                    value_buf.push('"');
                }
            } else {
                value_buf.push(c);
            }
        }

        *content = result;
    }
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut file_content = reader.lines().collect::<Result<Vec<_>, _>>()?.join("\n");
        // A BOM left in by a plain reader would hide the first key
        if let Some(stripped) = file_content.strip_prefix('\u{feff}') {
            file_content = stripped.to_string();
        }

        Format::multiline_values_to_one_line(&mut file_content);

        let mut pairs = Vec::new();
        let mut pending_comments: Vec<String> = Vec::new();
        let mut in_block_comment = false;

        for line in file_content.lines() {
            let trimmed = line.trim();
            if in_block_comment {
                pending_comments.push(trimmed.to_string());
                if trimmed.contains("*/") {
                    in_block_comment = false;
                }
                continue;
            }
            if trimmed.starts_with("/*") {
                pending_comments.push(trimmed.to_string());
                in_block_comment = !trimmed.contains("*/");
                continue;
            }
            if trimmed.starts_with("//") {
                pending_comments.push(trimmed.to_string());
                continue;
            }
            if trimmed.is_empty() {
                continue;
            }

            match PAIR_LINE.captures(trimmed) {
                Some(caps) => pairs.push(Pair {
                    key: caps[1].to_string(),
                    value: caps[2].to_string(),
                    comments: std::mem::take(&mut pending_comments),
                }),
                None => {
                    tracing::debug!(line = trimmed, "Skipping unrecognized .strings line");
                    pending_comments.clear();
                }
            }
        }

        Ok(Format { pairs })
    }

    /// Writes pairs sorted by lowercased key, each followed by a blank line.
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut sorted: Vec<&Pair> = self.pairs.iter().collect();
        sorted.sort_by_key(|p| p.key.to_lowercase());

        let mut content = String::new();
        for pair in sorted {
            content.push_str(&pair.to_string());
            content.push('\n');
        }

        writer.write_all(content.as_bytes()).map_err(Error::Io)?;
        writer.flush().map_err(Error::Io)
    }

    /// Override default file reading to support BOM-aware decoding (e.g., UTF-16 Apple .strings)
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        // Auto-detect BOM, decode to UTF-8; passthrough UTF-8
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Self::from_str(&decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_parse_pairs_with_comments() {
        let content = indoc! {r#"
            /* Greeting on the home screen */
            "GREETING" = "Hello %@";

            // Shown when leaving
            "FAREWELL" = "Goodbye";
            "BARE" = "No comment";
        "#};
        let format = Format::from_str(content).unwrap();
        assert_eq!(format.pairs.len(), 3);
        assert_eq!(format.pairs[0].key, "GREETING");
        assert_eq!(format.pairs[0].value, "Hello %@");
        assert_eq!(format.pairs[0].comments, vec!["/* Greeting on the home screen */"]);
        assert_eq!(format.pairs[1].comments, vec!["// Shown when leaving"]);
        assert!(format.pairs[2].comments.is_empty());
    }

    #[test]
    fn test_parse_multiline_block_comment() {
        let content = indoc! {r#"
            /* First line
               second line */
            "KEY" = "Value";
        "#};
        let format = Format::from_str(content).unwrap();
        assert_eq!(format.pairs.len(), 1);
        assert_eq!(format.pairs[0].comments.len(), 2);
    }

    #[test]
    fn test_values_with_equals_and_escaped_quotes() {
        let content = r#""EQUATION" = "a = b";
"QUOTE" = "Say \"hi\"";
"#;
        let format = Format::from_str(content).unwrap();
        assert_eq!(format.pairs[0].value, "a = b");
        assert_eq!(format.pairs[1].value, r#"Say \"hi\""#);
    }

    #[test]
    fn test_multiline_value_joined() {
        let content = "\"KEY\" = \"line one\n    line two\";\n";
        let format = Format::from_str(content).unwrap();
        assert_eq!(format.pairs[0].value, r"line one\nline two");
    }

    #[test]
    fn test_skips_invalid_lines() {
        let content = indoc! {r#"
            /* orphan comment */
            garbage line
            "KEY" = "Value";
        "#};
        let format = Format::from_str(content).unwrap();
        assert_eq!(format.pairs.len(), 1);
        assert!(format.pairs[0].comments.is_empty());
    }

    #[test]
    fn test_write_sorted_with_default_comment() {
        let format = Format::from_records(&[
            ResourceRecord::simple("beta", "B"),
            ResourceRecord::simple("Alpha", ""),
        ]);
        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        let expected = concat!(
            "/* No comment provided by engineer. */\n",
            "\"Alpha\" = \"Alpha\";\n",
            "\n",
            "/* No comment provided by engineer. */\n",
            "\"beta\" = \"B\";\n",
            "\n",
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_bom_prefixed_content() {
        let content = "\u{feff}\"KEY\" = \"Value\";\n";
        let format = Format::from_str(content).unwrap();
        assert_eq!(format.pairs[0].key, "KEY");
    }

    #[test]
    fn test_records_keep_comments() {
        let format = Format::from_str("// note\n\"KEY\" = \"Value\";\n").unwrap();
        let records = format.records();
        assert_eq!(records[0].comments, vec!["// note"]);
        assert!(records[0].is_indexed());
    }
}
