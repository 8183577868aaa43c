//! XML ↔ [`Value`] tree mapping.
//!
//! Decoding unwraps the root element. Child elements become object keys,
//! repeated children collect into an array, attributes become `@name` keys and
//! text mixed with children is kept under `#text`. XML has no scalar types, so
//! every leaf decodes to a string.
//!
//! Encoding wraps the value in a `<root>` element. Array items that have no key
//! of their own are written as `<item>` elements.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde_json::{Map, Value};

use crate::{Error, Result, TargetFormat};

/// Element wrapping an encoded document.
pub const ROOT_ELEMENT: &str = "root";

/// Element used for array items that have no key.
pub const ITEM_ELEMENT: &str = "item";

const ATTRIBUTE_PREFIX: char = '@';
const TEXT_KEY: &str = "#text";

fn malformed(message: impl Into<String>) -> Error {
    Error::malformed(TargetFormat::Xml, message)
}

// ============================================================================
// Decoding
// ============================================================================

/// An element whose end tag has not been read yet.
struct OpenElement {
    name: String,
    fields: Map<String, Value>,
    text: String,
    // A child element closed since the last text piece.
    after_child: bool,
}

impl OpenElement {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| malformed(format!("element name is not UTF-8: {e}")))?
            .to_owned();

        let mut fields = Map::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| malformed(e.to_string()))?;
            let key = std::str::from_utf8(attribute.key.as_ref())
                .map_err(|e| malformed(format!("attribute name is not UTF-8: {e}")))?;
            let value = attribute
                .unescape_value()
                .map_err(|e| malformed(e.to_string()))?;
            fields.insert(
                format!("{ATTRIBUTE_PREFIX}{key}"),
                Value::String(value.into_owned()),
            );
        }

        Ok(Self {
            name,
            fields,
            text: String::new(),
            after_child: false,
        })
    }

    fn add_child(&mut self, name: String, value: Value) {
        self.after_child = true;
        match self.fields.get_mut(&name) {
            None => {
                self.fields.insert(name, value);
            }
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }

    fn close(mut self) -> (String, Value) {
        if self.fields.is_empty() {
            return (self.name, Value::String(self.text));
        }
        if !self.text.is_empty() {
            self.fields
                .insert(TEXT_KEY.to_string(), Value::String(self.text));
        }
        (self.name, Value::Object(self.fields))
    }
}

/// Builds the tree while events are read.
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<OpenElement>,
    root: Option<Value>,
}

impl TreeBuilder {
    fn start(&mut self, start: &BytesStart<'_>) -> Result<()> {
        if self.stack.is_empty() && self.root.is_some() {
            return Err(malformed("document has more than one root element"));
        }
        self.stack.push(OpenElement::open(start)?);
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        let element = self
            .stack
            .pop()
            .ok_or_else(|| malformed("end tag without a matching start tag"))?;
        let (name, value) = element.close();
        match self.stack.last_mut() {
            Some(parent) => parent.add_child(name, value),
            None => self.root = Some(value),
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        let element = self
            .stack
            .last_mut()
            .ok_or_else(|| malformed(format!("text outside the root element: {text:?}")))?;
        if element.after_child && !element.text.is_empty() && !text.is_empty() {
            element.text.push(' ');
        }
        element.after_child = false;
        element.text.push_str(text);
        Ok(())
    }

    fn finish(self) -> Result<Value> {
        if let Some(element) = self.stack.last() {
            return Err(malformed(format!("unclosed element <{}>", element.name)));
        }
        self.root
            .ok_or_else(|| malformed("document has no root element"))
    }
}

/// Decode an XML document into a [`Value`] tree.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if the document is not well-formed.
pub fn to_value(body: &[u8]) -> Result<Value> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut builder = TreeBuilder::default();
    let mut buf = Vec::new();
    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| malformed(format!("at byte {}: {e}", reader.buffer_position())))?;

        match event {
            Event::Start(start) => builder.start(&start)?,
            Event::Empty(start) => {
                builder.start(&start)?;
                builder.end()?;
            }
            Event::End(_) => builder.end()?,
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| malformed(e.to_string()))?;
                builder.text(&text)?;
            }
            Event::CData(data) => {
                let text = String::from_utf8(data.into_inner().into_owned())
                    .map_err(|e| malformed(format!("CDATA is not UTF-8: {e}")))?;
                builder.text(&text)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctype
            _ => {}
        }
        buf.clear();
    }

    builder.finish()
}

// ============================================================================
// Encoding
// ============================================================================

/// Encode a [`Value`] tree as an XML document wrapped in [`ROOT_ELEMENT`].
///
/// # Errors
///
/// Returns [`Error::XmlSerialization`] if writing fails.
pub fn from_value(value: &Value) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, ROOT_ELEMENT, value)?;
    Ok(writer.into_inner())
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::XmlSerialization(e.to_string()))
}

fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => Some(Cow::Borrowed("")),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, key: &str, value: &Value) -> Result<()> {
    let name = element_name(key);

    match value {
        Value::Null => emit(writer, Event::Empty(BytesStart::new(&*name))),
        Value::Array(items) => {
            emit(writer, Event::Start(BytesStart::new(&*name)))?;
            for item in items {
                write_element(writer, ITEM_ELEMENT, item)?;
            }
            emit(writer, Event::End(BytesEnd::new(&*name)))
        }
        Value::Object(fields) => write_object(writer, &name, fields),
        scalar => {
            let text = scalar_text(scalar).unwrap_or_default();
            emit(writer, Event::Start(BytesStart::new(&*name)))?;
            emit(writer, Event::Text(BytesText::new(&text)))?;
            emit(writer, Event::End(BytesEnd::new(&*name)))
        }
    }
}

fn write_object(writer: &mut Writer<Vec<u8>>, name: &str, fields: &Map<String, Value>) -> Result<()> {
    let mut start = BytesStart::new(name);
    let mut text = None;
    let mut children = Vec::with_capacity(fields.len());

    for (key, value) in fields {
        match (key.strip_prefix(ATTRIBUTE_PREFIX), scalar_text(value)) {
            (Some(attribute), Some(scalar)) => {
                let attribute = element_name(attribute);
                start.push_attribute((&*attribute, &*scalar));
            }
            (None, Some(scalar)) if key == TEXT_KEY => text = Some(scalar),
            _ => children.push((key, value)),
        }
    }

    emit(writer, Event::Start(start))?;
    if let Some(text) = text {
        emit(writer, Event::Text(BytesText::new(&text)))?;
    }
    for (key, value) in children {
        match value {
            Value::Array(items) => {
                for item in items {
                    write_element(writer, key, item)?;
                }
            }
            other => write_element(writer, key, other)?,
        }
    }
    emit(writer, Event::End(BytesEnd::new(name)))
}

// ============================================================================
// Names
// ============================================================================

const fn is_name_start(c: char) -> bool {
    matches!(c,
        'A'..='Z' | 'a'..='z' | '_'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}'
    )
}

const fn is_name_char(c: char) -> bool {
    is_name_start(c)
        || matches!(c,
            ':' | '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

/// Turn an arbitrary key into a valid XML element name.
///
/// Invalid characters become `_`; a name that cannot start with its first
/// character is prefixed with `_`.
#[must_use]
pub fn element_name(key: &str) -> Cow<'_, str> {
    let mut chars = key.chars();
    let valid = chars.next().is_some_and(is_name_start) && chars.all(is_name_char);
    if valid {
        return Cow::Borrowed(key);
    }

    let mut name: String = key
        .chars()
        .map(|c| if is_name_char(c) { c } else { '_' })
        .collect();
    if !name.chars().next().is_some_and(is_name_start) {
        name.insert(0, '_');
    }
    Cow::Owned(name)
}
