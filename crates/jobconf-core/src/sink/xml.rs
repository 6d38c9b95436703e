//! Hadoop configuration resource format.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <configuration>
//!   <property>
//!     <name>mapred.job.priority</name>
//!     <value>HIGH</value>
//!   </property>
//! </configuration>
//! ```
use std::{
    borrow::Cow,
    fs,
    io::{self, Write},
    path::Path,
};

use jobconf_model::MergedConfig;
use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::sink::{ConfigSink, SinkError};

const ROOT: &str = "configuration";
const PROPERTY: &str = "property";
const NAME: &str = "name";
const VALUE: &str = "value";

/// [`ConfigSink`] writing the Hadoop XML format.
///
/// The file is written next to its destination and renamed into place, so a
/// reader sees either the previous content or the complete new one.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlConfigSink;

impl ConfigSink for XmlConfigSink {
    fn write(&self, config: &MergedConfig, path: &Path) -> Result<(), SinkError> {
        let xml = to_xml_string(config)?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(xml.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| SinkError::Io(e.error))?;

        debug!(path = %path.display(), entries = config.len(), "wrote configuration resource");
        Ok(())
    }
}

/// Encode `config` in entry order. Text is escaped.
pub fn to_xml_string(config: &MergedConfig) -> Result<String, SinkError> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);

    emit(&mut w, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    emit(&mut w, Event::Start(BytesStart::new(ROOT)))?;
    for (key, value) in config.iter() {
        emit(&mut w, Event::Start(BytesStart::new(PROPERTY)))?;
        emit_text_element(&mut w, NAME, key)?;
        emit_text_element(&mut w, VALUE, value)?;
        emit(&mut w, Event::End(BytesEnd::new(PROPERTY)))?;
    }
    emit(&mut w, Event::End(BytesEnd::new(ROOT)))?;

    String::from_utf8(w.into_inner()).map_err(|e| SinkError::Encode(e.to_string()))
}

fn emit<W: io::Write>(w: &mut Writer<W>, event: Event<'_>) -> Result<(), SinkError> {
    w.write_event(event)
        .map_err(|e| SinkError::Encode(e.to_string()))
}

fn emit_text_element<W: io::Write>(
    w: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> Result<(), SinkError> {
    emit(w, Event::Start(BytesStart::new(tag)))?;
    emit(w, Event::Text(BytesText::new(text)))?;
    emit(w, Event::End(BytesEnd::new(tag)))
}

/// Load a resource file written by [`XmlConfigSink`] (or by Hadoop itself).
pub fn read_config_xml(path: &Path) -> Result<MergedConfig, SinkError> {
    let xml = fs::read_to_string(path)?;
    parse_config_xml(&xml)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Value,
}

#[derive(Default)]
struct PendingProperty {
    name: Option<String>,
    value: Option<String>,
}

impl PendingProperty {
    fn append(&mut self, field: Field, text: &str) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Value => &mut self.value,
        };
        slot.get_or_insert_with(String::new).push_str(text);
    }
}

/// Decode the Hadoop configuration format.
///
/// Elements other than `<name>` and `<value>` inside a `<property>` (for
/// example `<final>` or `<source>`) are ignored. A missing `<value>` reads as
/// the empty string; a missing or empty `<name>` is an error. Names and values
/// are taken verbatim. Later duplicates win.
pub fn parse_config_xml(xml: &str) -> Result<MergedConfig, SinkError> {
    let mut reader = Reader::from_str(xml);
    let mut out = MergedConfig::new();
    let mut pending: Option<PendingProperty> = None;
    let mut field: Option<Field> = None;

    loop {
        let event = match reader.read_event() {
            Ok(ev) => ev,
            Err(e) => {
                return Err(SinkError::Malformed(format!(
                    "at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
        };

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"property" => pending = Some(PendingProperty::default()),
                b"name" if pending.is_some() => field = Some(Field::Name),
                b"value" if pending.is_some() => field = Some(Field::Value),
                _ => field = None,
            },
            Event::Empty(e) => {
                if let (Some(p), b"value") = (pending.as_mut(), e.name().as_ref()) {
                    p.value.get_or_insert_with(String::new);
                }
            }
            Event::Text(t) => {
                if let (Some(p), Some(f)) = (pending.as_mut(), field) {
                    let text = t
                        .unescape()
                        .map_err(|e| SinkError::Malformed(e.to_string()))?;
                    p.append(f, &text);
                }
            }
            Event::CData(c) => {
                if let (Some(p), Some(f)) = (pending.as_mut(), field) {
                    let text: Cow<'_, str> = String::from_utf8_lossy(&c);
                    p.append(f, &text);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"property" => {
                    let Some(p) = pending.take() else {
                        continue;
                    };
                    let name = p
                        .name
                        .filter(|n| !n.is_empty())
                        .ok_or_else(|| SinkError::Malformed("property without <name>".into()))?;
                    out.set(name, p.value.unwrap_or_default());
                    field = None;
                }
                _ => field = None,
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}
