//! Support for Android `strings.xml` resource files.
//!
//! `<string>` elements become simple records and `<plurals>` become plural
//! records whose items are kept verbatim. Any other resource element is
//! rejected with [`Error::UnsupportedKind`], since the file is rewritten from
//! its records and the element would be lost.

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{BufRead, Write};

use crate::{
    error::Error,
    traits::Parser,
    types::{PluralItem, ResourceRecord, StringKind},
};

const TOOLS_NAMESPACE: &str = "http://schemas.android.com/tools";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    /// Default-language files are written without `tools:ignore="MissingTranslation"`.
    pub is_default: bool,
    pub records: Vec<ResourceRecord>,
}

impl Format {
    pub fn new(is_default: bool, records: Vec<ResourceRecord>) -> Self {
        Self {
            is_default,
            records,
        }
    }
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        // Whitespace inside values is significant, so text is never trimmed
        let mut xml_reader = Reader::from_reader(reader);

        let mut buf = Vec::new();
        let mut records = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"string" => {
                    let (name, translatable) = parse_name_attributes(e)?;
                    let value = read_text(&mut xml_reader, b"string")?;
                    let mut record = ResourceRecord::simple(name, value);
                    record.translatable = translatable;
                    records.push(record);
                }
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"string" => {
                    let (name, translatable) = parse_name_attributes(e)?;
                    let mut record = ResourceRecord::simple(name, "");
                    record.translatable = translatable;
                    records.push(record);
                }
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"plurals" => {
                    let (name, translatable) = parse_name_attributes(e)?;
                    let items = parse_plural_items(&mut xml_reader)?;
                    let mut record = ResourceRecord::plural(name, items);
                    record.translatable = translatable;
                    records.push(record);
                }
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if e.name().as_ref() != b"resources" => {
                    let kind = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(Error::UnsupportedKind(kind));
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }
        Ok(Format {
            is_default: false, // strings.xml does not say which language it holds
            records,
        })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        let mut resources_start = BytesStart::new("resources");
        resources_start.push_attribute(("xmlns:tools", TOOLS_NAMESPACE));
        if !self.is_default {
            resources_start.push_attribute(("tools:ignore", "MissingTranslation"));
        }
        xml_writer.write_event(Event::Start(resources_start))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        let mut sorted: Vec<&ResourceRecord> = self.records.iter().collect();
        sorted.sort_by_key(|r| r.key.to_lowercase());

        for record in sorted {
            xml_writer.write_event(Event::Text(BytesText::new("    ")))?;
            if record.plural_items.is_empty() && record.kind == StringKind::Simple {
                let mut elem = BytesStart::new("string");
                elem.push_attribute(("name", record.key.as_str()));
                if !record.translatable {
                    elem.push_attribute(("translatable", "false"));
                }
                xml_writer.write_event(Event::Start(elem))?;
                xml_writer.write_event(Event::Text(BytesText::new(&record.value)))?;
                xml_writer.write_event(Event::End(BytesEnd::new("string")))?;
            } else {
                let mut elem = BytesStart::new("plurals");
                elem.push_attribute(("name", record.key.as_str()));
                if !record.translatable {
                    elem.push_attribute(("translatable", "false"));
                }
                elem.push_attribute(("tools:ignore", "UnusedQuantity"));
                xml_writer.write_event(Event::Start(elem))?;
                for item in &record.plural_items {
                    xml_writer.write_event(Event::Text(BytesText::new("\n        ")))?;
                    let mut item_elem = BytesStart::new("item");
                    item_elem.push_attribute(("quantity", item.quantity.as_str()));
                    xml_writer.write_event(Event::Start(item_elem))?;
                    xml_writer.write_event(Event::Text(BytesText::new(&item.value)))?;
                    xml_writer.write_event(Event::End(BytesEnd::new("item")))?;
                }
                xml_writer.write_event(Event::Text(BytesText::new("\n    ")))?;
                xml_writer.write_event(Event::End(BytesEnd::new("plurals")))?;
            }
            xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("resources")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

/// Reads `name` and `translatable` from a `<string>` or `<plurals>` tag.
fn parse_name_attributes(e: &BytesStart) -> Result<(String, bool), Error> {
    let mut name = None;
    let mut translatable = true;

    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::InvalidResource(e.to_string()))?;
        match attr.key.as_ref() {
            b"name" => name = Some(attr.unescape_value()?.to_string()),
            b"translatable" => translatable = attr.unescape_value()? != "false",
            _ => {}
        }
    }
    let name = name.ok_or_else(|| {
        Error::InvalidResource(format!(
            "{} tag missing 'name'",
            String::from_utf8_lossy(e.name().as_ref())
        ))
    })?;
    Ok((name, translatable))
}

/// Collects the text content of the current element up to its end tag.
/// Nested markup is dropped, its text is kept.
fn read_text<R: BufRead>(xml_reader: &mut Reader<R>, end: &[u8]) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut value = String::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => value.push_str(&e.unescape()?),
            Ok(Event::CData(e)) => value.push_str(&String::from_utf8_lossy(&e.into_inner())),
            Ok(Event::End(e)) if e.name().as_ref() == end => break,
            Ok(Event::Eof) => return Err(Error::InvalidResource("Unexpected EOF".to_string())),
            Ok(_) => (),
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(value)
}

fn parse_plural_items<R: BufRead>(xml_reader: &mut Reader<R>) -> Result<Vec<PluralItem>, Error> {
    let mut buf = Vec::new();
    let mut items = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"item" => {
                let mut quantity = None;
                for attr in e.attributes().with_checks(false) {
                    let attr = attr.map_err(|e| Error::InvalidResource(e.to_string()))?;
                    if attr.key.as_ref() == b"quantity" {
                        quantity = Some(attr.unescape_value()?.to_string());
                    }
                }
                let quantity = quantity.ok_or_else(|| {
                    Error::InvalidResource("plural item missing 'quantity'".to_string())
                })?;
                let value = read_text(xml_reader, b"item")?;
                items.push(PluralItem { quantity, value });
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"plurals" => break,
            Ok(Event::Eof) => return Err(Error::InvalidResource("Unexpected EOF".to_string())),
            Ok(_) => (),
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(items)
}
