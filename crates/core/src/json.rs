//! Raw JSON object maps and the wire-format codec trait.
//!
//! Entities are decoded from a `RawMap` (top-level keys mapped to their
//! unparsed JSON text) so that fields the model does not understand can be
//! carried back out byte-for-byte.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::value::RawValue;

use crate::error::{CodecError, Result};

/// Top-level keys of a JSON object mapped to their raw encodings.
pub type RawMap = BTreeMap<String, Box<RawValue>>;

/// Parse a payload that must be a JSON object.
pub fn parse_object(data: &[u8]) -> Result<RawMap> {
    Ok(serde_json::from_slice(data)?)
}

/// Decode an optional field, mapping shape errors to `TypeMismatch`.
pub fn field<T: DeserializeOwned>(
    fields: &RawMap,
    key: &str,
    expected: &'static str,
) -> Result<Option<T>> {
    match fields.get(key) {
        Some(raw) => serde_json::from_str(raw.get())
            .map(Some)
            .map_err(|_| CodecError::type_mismatch(key, expected)),
        None => Ok(None),
    }
}

/// Decode a field that must be a JSON string, treating `null` as absent.
pub fn string_field(fields: &RawMap, key: &str) -> Result<Option<String>> {
    Ok(field::<Option<String>>(fields, key, "string")?.flatten())
}

/// Encode `value` and store it under `key`.
pub fn put<T: Serialize + ?Sized>(fields: &mut RawMap, key: &str, value: &T) -> Result<()> {
    fields.insert(key.to_string(), serde_json::value::to_raw_value(value)?);
    Ok(())
}

/// Store an already-encoded JSON document under `key`.
pub fn put_raw(fields: &mut RawMap, key: &str, json: String) -> Result<()> {
    fields.insert(key.to_string(), RawValue::from_string(json)?);
    Ok(())
}

/// Bidirectional transform between a typed entity and its JSON wire shape.
pub trait JsonCodec: Sized {
    fn from_json_map(raw: RawMap) -> Result<Self>;

    fn to_json_map(&self) -> Result<RawMap>;

    fn from_json(data: &[u8]) -> Result<Self> {
        Self::from_json_map(parse_object(data)?)
    }

    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json_map()?)?)
    }

    /// Compact encoding with the entity's own keys sorted.
    ///
    /// Raw unknown values keep their number text and key order; only
    /// insignificant whitespace is removed, so the result decodes back to an
    /// equal entity.
    fn to_canonical_json(&self) -> Result<String> {
        Ok(compact(&self.to_json()?))
    }
}

/// Strip whitespace outside string literals without reparsing.
fn compact(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let (mut in_string, mut escaped) = (false, false);
    for ch in json.chars() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
        } else if ch == '"' {
            in_string = true;
            out.push(ch);
        } else if !matches!(ch, ' ' | '\t' | '\n' | '\r') {
            out.push(ch);
        }
    }
    out
}
