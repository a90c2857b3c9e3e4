//! Read access to a declarative-schema tree.
//!
//! Entities never touch the schema engine's storage directly; they only ask
//! a [`Decoder`] for values by dotted path.

use crate::error::{CodecError, Result};

use super::value::{Properties, Value};

/// The two read primitives the schema engine must provide.
pub trait Decoder {
    /// Current value at `path`, or `None` when the path is not set.
    fn get_ok(&self, path: &str) -> Option<Value>;

    /// `(prior, current)` values at `path`.
    fn get_change(&self, path: &str) -> (Option<Value>, Option<Value>);
}

/// In-memory decoder over a [`Properties`] tree.
///
/// An optional prior tree backs the old half of [`Decoder::get_change`].
#[derive(Debug, Clone, Copy)]
pub struct TreeDecoder<'a> {
    current: &'a Properties,
    prior: Option<&'a Properties>,
}

impl<'a> TreeDecoder<'a> {
    pub fn new(current: &'a Properties) -> Self {
        Self {
            current,
            prior: None,
        }
    }

    pub fn with_prior(current: &'a Properties, prior: &'a Properties) -> Self {
        Self {
            current,
            prior: Some(prior),
        }
    }
}

impl Decoder for TreeDecoder<'_> {
    fn get_ok(&self, path: &str) -> Option<Value> {
        self.current.lookup(path)
    }

    fn get_change(&self, path: &str) -> (Option<Value>, Option<Value>) {
        (
            self.prior.and_then(|p| p.lookup(path)),
            self.current.lookup(path),
        )
    }
}

/// Decoder scoped to one element of a nested block list.
///
/// Paths are rewritten to `<list>.<index>.<path>` before reaching the parent.
pub struct NestedDecoder<'a> {
    parent: &'a dyn Decoder,
    prefix: String,
}

impl<'a> NestedDecoder<'a> {
    pub fn new(parent: &'a dyn Decoder, list: &str, index: usize) -> Self {
        Self {
            parent,
            prefix: format!("{list}.{index}"),
        }
    }

    fn path(&self, path: &str) -> String {
        format!("{}.{}", self.prefix, path)
    }
}

impl Decoder for NestedDecoder<'_> {
    fn get_ok(&self, path: &str) -> Option<Value> {
        self.parent.get_ok(&self.path(path))
    }

    fn get_change(&self, path: &str) -> (Option<Value>, Option<Value>) {
        self.parent.get_change(&self.path(path))
    }
}

/// Typed reads on top of [`Decoder`], failing with `TypeMismatch`.
pub trait DecoderExt: Decoder {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        match self.get_ok(key) {
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(CodecError::type_mismatch(key, "string")),
            None => Ok(None),
        }
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get_ok(key) {
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(_) => Err(CodecError::type_mismatch(key, "bool")),
            None => Ok(None),
        }
    }

    /// New half of [`Decoder::get_change`] as a bool.
    fn get_bool_change(&self, key: &str) -> Result<Option<bool>> {
        match self.get_change(key).1 {
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(_) => Err(CodecError::type_mismatch(key, "bool")),
            None => Ok(None),
        }
    }

    fn get_float(&self, key: &str) -> Result<Option<f64>> {
        match self.get_ok(key) {
            Some(Value::Float(f)) => Ok(Some(f)),
            Some(Value::Int(i)) => Ok(Some(i as f64)),
            Some(_) => Err(CodecError::type_mismatch(key, "float")),
            None => Ok(None),
        }
    }

    /// Number of elements of the list at `key` (`key.#`).
    fn get_count(&self, key: &str) -> Result<Option<usize>> {
        match self.get_ok(&format!("{key}.#")) {
            Some(Value::Int(n)) if n >= 0 => Ok(Some(n as usize)),
            Some(_) => Err(CodecError::type_mismatch(key, "list")),
            None => match self.get_ok(key) {
                Some(_) => Err(CodecError::type_mismatch(key, "list")),
                None => Ok(None),
            },
        }
    }

    fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.get_ok(key) {
            Some(Value::List(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    _ => Err(CodecError::type_mismatch(key, "list of strings")),
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(_) => Err(CodecError::type_mismatch(key, "list")),
            None => Ok(None),
        }
    }
}

impl<D: Decoder + ?Sized> DecoderExt for D {}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Properties {
        let mut comparison = Properties::new();
        comparison.insert("negate", true);
        let mut condition = Properties::new();
        condition.insert("key", "HOST_NAME");
        condition.insert("indexed_name", vec![Value::Block(comparison)]);
        let mut rule = Properties::new();
        rule.insert("enabled", false);
        rule.insert("target", 95_i64);
        rule.insert(
            "propagation_types",
            vec![Value::from("SERVICE_TO_HOST_LIKE")],
        );
        rule.insert("conditions", vec![Value::Block(condition)]);
        rule
    }

    #[test]
    fn nested_decoder_prefixes_paths() {
        let props = tree();
        let root = TreeDecoder::new(&props);
        let condition = NestedDecoder::new(&root, "conditions", 0);
        assert_eq!(condition.get_string("key").unwrap().as_deref(), Some("HOST_NAME"));
        let comparison = NestedDecoder::new(&condition, "indexed_name", 0);
        assert_eq!(comparison.get_bool("negate").unwrap(), Some(true));
    }

    #[test]
    fn typed_reads_report_mismatch() {
        let props = tree();
        let decoder = TreeDecoder::new(&props);
        assert!(matches!(
            decoder.get_string("enabled"),
            Err(CodecError::TypeMismatch { .. })
        ));
        assert!(matches!(
            decoder.get_count("enabled"),
            Err(CodecError::TypeMismatch { .. })
        ));
        assert_eq!(decoder.get_float("target").unwrap(), Some(95.0));
        assert_eq!(decoder.get_count("conditions").unwrap(), Some(1));
        assert_eq!(decoder.get_count("missing").unwrap(), None);
        assert_eq!(
            decoder.get_string_list("propagation_types").unwrap(),
            Some(vec!["SERVICE_TO_HOST_LIKE".to_string()])
        );
    }

    #[test]
    fn get_change_reports_prior_and_current() {
        let current = tree();
        let mut prior = Properties::new();
        prior.insert("enabled", true);
        let decoder = TreeDecoder::with_prior(&current, &prior);
        assert_eq!(
            decoder.get_change("enabled"),
            (Some(Value::Bool(true)), Some(Value::Bool(false)))
        );
        assert_eq!(decoder.get_bool_change("enabled").unwrap(), Some(false));
        assert_eq!(TreeDecoder::new(&current).get_change("enabled").0, None);
    }
}
