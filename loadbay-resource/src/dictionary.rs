//! Configuration dictionaries and the payload decoder.
//!
//! A configuration payload arrives either as a structured dialect document
//! (the `config` extension, read as TOML) or as a generic property list:
//! markup (`<properties><entry key="…">…</entry></properties>`) when the
//! first byte is `<`, flat `key=value` lines otherwise. All entries are
//! normalized to string keys with opaque JSON values.

use std::collections::BTreeMap;
use std::io::Read;

use serde_json::Value;

use crate::error::ResourceError;

/// Immutable key/value snapshot of a configuration payload. Keys are
/// unique; iteration order carries no meaning.
pub type Dictionary = BTreeMap<String, Value>;

/// Extension identifying the structured configuration dialect.
const STRUCTURED_DIALECT: &str = "config";

/// Decodes a raw configuration stream into a dictionary. Any I/O or parse
/// failure is reported as `UnreadableDictionary`, undistinguished.
pub fn read_dictionary<R: Read>(mut reader: R, extension: &str) -> Result<Dictionary, ResourceError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| ResourceError::UnreadableDictionary(e.to_string()))?;
    decode(&bytes, extension).map_err(ResourceError::UnreadableDictionary)
}

fn decode(bytes: &[u8], extension: &str) -> Result<Dictionary, String> {
    let text = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;

    if extension == STRUCTURED_DIALECT {
        let table: toml::Table = toml::from_str(text).map_err(|e| e.to_string())?;
        return Ok(table
            .into_iter()
            .map(|(key, value)| (key, toml_to_json(value)))
            .collect());
    }

    let entries = if bytes.first() == Some(&b'<') {
        parse_markup(text)?
    } else {
        parse_properties(text)
    };
    Ok(entries
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect())
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(d) => Value::String(d.to_string()),
        toml::Value::Array(a) => Value::Array(a.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(t) => Value::Object(
            t.into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

/// Markup property list: `<entry key="k">v</entry>` elements inside a
/// `<properties>` document. Self-closing entries yield empty values.
fn parse_markup(text: &str) -> Result<Vec<(String, String)>, String> {
    if !text.contains("<properties") {
        return Err("not a properties document".to_string());
    }

    let mut entries = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("<entry") {
        rest = &rest[start + "<entry".len()..];
        let tag_end = rest.find('>').ok_or("unterminated entry tag")?;
        let tag = &rest[..tag_end];
        rest = &rest[tag_end + 1..];

        let key = attribute(tag, "key").ok_or("entry without key attribute")?;
        if tag.trim_end().ends_with('/') {
            entries.push((unescape(&key), String::new()));
            continue;
        }

        let close = rest.find("</entry>").ok_or("unterminated entry value")?;
        let value = &rest[..close];
        rest = &rest[close + "</entry>".len()..];
        entries.push((unescape(&key), unescape(value)));
    }
    Ok(entries)
}

fn attribute(tag: &str, name: &str) -> Option<String> {
    let marker = format!("{name}=\"");
    let start = tag.find(&marker)? + marker.len();
    let end = tag[start..].find('"')? + start;
    Some(tag[start..end].to_string())
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Flat property lines: `#`/`!` comments, `=` or `:` separators, trimmed.
/// A line without a separator becomes a key with an empty value.
fn parse_properties(text: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        match line.find(['=', ':']) {
            Some(pos) => entries.push((
                line[..pos].trim_end().to_string(),
                line[pos + 1..].trim_start().to_string(),
            )),
            None => entries.push((line.to_string(), String::new())),
        }
    }
    entries
}
