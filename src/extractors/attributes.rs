// src/extractors/attributes.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::utils::error::ExtractError;

// One token per match: name="v", name='v', name=v, "v", 'v' or a bare word.
static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"([\w-]+)\s*=\s*"([^"]*)"(?:\s|$)|([\w-]+)\s*=\s*'([^']*)'(?:\s|$)|([\w-]+)\s*=\s*([^\s'"]+)(?:\s|$)|"([^"]*)"(?:\s|$)|'([^']*)'(?:\s|$)|(\S+)(?:\s|$)"#,
    )
    .expect("Failed to compile ATTRIBUTE_RE")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    Named(String),
    Positional(usize),
}

/// Ordered attributes of one shortcode occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(AttributeKey, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw attribute fragment. An empty fragment gives an empty set.
    pub fn parse(fragment: &str) -> Self {
        let mut attrs = Self::new();
        let text = fragment.replace(|c: char| c == '\u{a0}' || c == '\u{200b}', " ");

        for caps in ATTRIBUTE_RE.captures_iter(&text) {
            let named = [(1, 2), (3, 4), (5, 6)]
                .iter()
                .find_map(|&(k, v)| Some((caps.get(k)?.as_str(), caps.get(v)?.as_str())));

            if let Some((name, value)) = named {
                attrs.push_named(&name.to_lowercase(), &strip_c_slashes(value));
            } else if let Some(value) = [7, 8, 9].iter().find_map(|&i| caps.get(i)) {
                attrs.push_positional(&strip_c_slashes(value.as_str()));
            }
        }

        attrs
    }

    /// Sets a named value. A repeated name keeps its first position and takes the new value.
    pub fn push_named(&mut self, name: &str, value: &str) {
        let existing = self
            .entries
            .iter_mut()
            .find(|(k, _)| matches!(k, AttributeKey::Named(n) if n == name));

        match existing {
            Some((_, slot)) => *slot = value.to_string(),
            None => self
                .entries
                .push((AttributeKey::Named(name.to_string()), value.to_string())),
        }
    }

    /// Appends a positional value keyed by the next free index.
    pub fn push_positional(&mut self, value: &str) {
        let index = self.positional_count();
        self.entries
            .push((AttributeKey::Positional(index), value.to_string()));
    }

    fn positional_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| matches!(k, AttributeKey::Positional(_)))
            .count()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &(AttributeKey, String)> {
        self.entries.iter()
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find_map(|(k, v)| match k {
            AttributeKey::Named(n) if n == name => Some(v.as_str()),
            _ => None,
        })
    }

    #[cfg(test)]
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.entries.iter().find_map(|(k, v)| match k {
            AttributeKey::Positional(i) if *i == index => Some(v.as_str()),
            _ => None,
        })
    }

    /// True when every entry is positional, i.e. the set encodes as a plain list.
    fn is_list(&self) -> bool {
        !self.entries.is_empty()
            && self
                .entries
                .iter()
                .all(|(k, _)| matches!(k, AttributeKey::Positional(_)))
    }

    /// Human-readable form: `name: value` or bare `value`, one per CRLF-separated line.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| match k {
                AttributeKey::Named(name) => format!("{}: {}", name, v),
                AttributeKey::Positional(_) => v.clone(),
            })
            .collect::<Vec<_>>()
            .join("\r\n")
    }

    /// JSON encoding used for the parameters_raw column. Empty sets encode as `{}`.
    pub fn to_json(&self) -> Result<String, ExtractError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Undoes C-style escapes in attribute values: `\n`, `\t` and friends, octal `\101`,
/// hex `\x41`, and `\c` for any other character. A trailing lone backslash is kept.
fn strip_c_slashes(value: &str) -> String {
    if !value.contains('\\') {
        return value.to_string();
    }

    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' || i + 1 == bytes.len() {
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        i += 1;
        match bytes[i] {
            b'n' => out.push(b'\n'),
            b't' => out.push(b'\t'),
            b'r' => out.push(b'\r'),
            b'a' => out.push(0x07),
            b'v' => out.push(0x0b),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'x' if bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit) => {
                let digits = bytes[i + 1..]
                    .iter()
                    .take(2)
                    .take_while(|b| b.is_ascii_hexdigit())
                    .count();
                let hex = &value[i + 1..i + 1 + digits];
                out.push(u8::from_str_radix(hex, 16).unwrap_or_default());
                i += digits;
            }
            b'0'..=b'7' => {
                let digits = bytes[i..]
                    .iter()
                    .take(3)
                    .take_while(|b| (b'0'..=b'7').contains(*b))
                    .count();
                let octal = &value[i..i + digits];
                out.push(u32::from_str_radix(octal, 8).unwrap_or_default() as u8);
                i += digits - 1;
            }
            other => out.push(other),
        }
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_list() {
            let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
            for (_, value) in &self.entries {
                seq.serialize_element(value)?;
            }
            return seq.end();
        }

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            match key {
                AttributeKey::Named(name) => map.serialize_entry(name, value)?,
                AttributeKey::Positional(index) => map.serialize_entry(&index.to_string(), value)?,
            }
        }
        map.end()
    }
}

struct AttributesVisitor;

impl<'de> Visitor<'de> for AttributesVisitor {
    type Value = Attributes;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map or list of shortcode attributes")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Attributes, A::Error> {
        let mut attrs = Attributes::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            match key.parse::<usize>() {
                Ok(index) => attrs.entries.push((AttributeKey::Positional(index), value)),
                Err(_) => attrs.push_named(&key, &value),
            }
        }
        Ok(attrs)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Attributes, A::Error> {
        let mut attrs = Attributes::new();
        while let Some(value) = access.next_element::<String>()? {
            attrs.push_positional(&value);
        }
        Ok(attrs)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Attributes, E> {
        Ok(Attributes::new())
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AttributesVisitor)
    }
}
