//! Unknown-field store.
//!
//! Every variant-capable entity owns one `Unknowns` holding the top-level
//! keys its current shape does not model. Values keep their original raw
//! encoding and are written back verbatim on the reverse path.

use serde_json::value::RawValue;

use crate::error::{CodecError, Result};
use crate::json::RawMap;

/// Residual fields of a payload, absent when empty.
#[derive(Debug, Clone, Default)]
pub struct Unknowns(Option<RawMap>);

impl Unknowns {
    pub fn new() -> Self {
        Self(None)
    }

    /// Wrap a residual map; an empty map becomes absent.
    pub fn from_map(map: RawMap) -> Self {
        if map.is_empty() {
            Self(None)
        } else {
            Self(Some(map))
        }
    }

    /// Parse the schema-side `unknowns` blob and drop `known` keys.
    ///
    /// A blob that is not a JSON object fails with
    /// [`CodecError::MalformedUnknownFieldData`].
    pub fn from_blob(blob: &str, known: &[&str]) -> Result<Self> {
        let (_, residual) = split(parse_blob(blob)?, known);
        Ok(residual)
    }

    /// Encode as the single JSON string stored under the schema's
    /// `unknowns` key, or `None` when there is nothing to carry.
    pub fn to_blob(&self) -> Result<Option<String>> {
        match &self.0 {
            Some(map) => Ok(Some(serde_json::to_string(map)?)),
            None => Ok(None),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn len(&self) -> usize {
        self.0.as_ref().map_or(0, |m| m.len())
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0.as_ref()?.get(key).map(|v| &**v)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Box<RawValue>) {
        self.0.get_or_insert_with(RawMap::new).insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Box<RawValue>> {
        let map = self.0.as_mut()?;
        let removed = map.remove(key);
        if map.is_empty() {
            self.0 = None;
        }
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.0
            .iter()
            .flat_map(|m| m.iter())
            .map(|(k, v)| (k.as_str(), &**v))
    }
}

/// Stores are equal when they hold the same keys with the same JSON
/// content; insignificant whitespace in the raw text is ignored.
impl PartialEq for Unknowns {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && same_json(va, vb))
    }
}

fn same_json(a: &RawValue, b: &RawValue) -> bool {
    if a.get() == b.get() {
        return true;
    }
    match (
        serde_json::from_str::<serde_json::Value>(a.get()),
        serde_json::from_str::<serde_json::Value>(b.get()),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Parse an `unknowns` blob into a raw object map.
pub fn parse_blob(blob: &str) -> Result<RawMap> {
    serde_json::from_str(blob).map_err(CodecError::MalformedUnknownFieldData)
}

/// Separate the `known` keys of `raw` from the residual.
pub fn split(mut raw: RawMap, known: &[&str]) -> (RawMap, Unknowns) {
    let mut fields = RawMap::new();
    for key in known {
        if let Some(value) = raw.remove(*key) {
            fields.insert((*key).to_string(), value);
        }
    }
    (fields, Unknowns::from_map(raw))
}

/// Recombine known fields with a residual; known fields win on collision.
pub fn merge(known: RawMap, residual: &Unknowns) -> RawMap {
    let mut out = residual.0.clone().unwrap_or_default();
    out.extend(known);
    out
}
