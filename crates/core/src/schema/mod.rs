//! Declarative-schema contract.
//!
//! The schema engine is injected: entities describe their fields through
//! [`Schema`], write a [`Properties`] tree and read back through a
//! [`Decoder`]. Nothing here assumes a storage format beyond those pieces
//! plus the `unknowns` string field carrying a JSON-encoded residual map.

mod decoder;
mod value;

pub use decoder::*;
pub use value::*;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{CodecError, Result};

/// Key under which every entity stores its JSON-encoded unknown fields.
pub const UNKNOWNS_KEY: &str = "unknowns";

/// Field name → descriptor.
pub type Schema = BTreeMap<&'static str, FieldSchema>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Bool,
    Int,
    Float,
    List,
}

/// Element descriptor of a list field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Elem {
    Type(FieldType),
    Resource(Schema),
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts_with: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_with: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elem: Option<Elem>,
}

impl FieldSchema {
    fn new(field_type: FieldType, description: &'static str) -> Self {
        Self {
            field_type,
            description,
            required: false,
            optional: true,
            deprecated: None,
            conflicts_with: Vec::new(),
            required_with: Vec::new(),
            min_items: None,
            max_items: None,
            elem: None,
        }
    }

    pub fn string(description: &'static str) -> Self {
        Self::new(FieldType::String, description)
    }

    pub fn bool(description: &'static str) -> Self {
        Self::new(FieldType::Bool, description)
    }

    pub fn float(description: &'static str) -> Self {
        Self::new(FieldType::Float, description)
    }

    pub fn string_list(description: &'static str) -> Self {
        let mut field = Self::new(FieldType::List, description);
        field.elem = Some(Elem::Type(FieldType::String));
        field
    }

    /// List of nested blocks, each described by `schema`.
    pub fn block_list(description: &'static str, schema: Schema) -> Self {
        let mut field = Self::new(FieldType::List, description);
        field.elem = Some(Elem::Resource(schema));
        field
    }

    /// The shared `unknowns` escape-hatch field.
    pub fn unknowns() -> Self {
        Self::string(
            "Any attributes that aren't yet supported by this version but have meanwhile been introduced by a newer version of the REST API",
        )
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.optional = false;
        self
    }

    pub fn deprecated(mut self, message: &'static str) -> Self {
        self.deprecated = Some(message);
        self
    }

    pub fn conflicts_with(mut self, keys: &[&'static str]) -> Self {
        self.conflicts_with = keys.to_vec();
        self
    }

    pub fn required_with(mut self, keys: &[&'static str]) -> Self {
        self.required_with = keys.to_vec();
        self
    }

    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }
}

/// An entity with a declarative-schema representation.
pub trait Resource: Sized {
    fn schema() -> Schema;

    fn to_properties(&self) -> Result<Properties>;

    fn from_decoder(decoder: &dyn Decoder) -> Result<Self>;

    fn from_properties(props: &Properties) -> Result<Self> {
        Self::from_decoder(&TreeDecoder::new(props))
    }
}

/// Check a tree against `schema`: field types, required keys, conflicting
/// and co-required groups, list bounds. Undeclared keys are rejected.
pub fn validate(schema: &Schema, props: &Properties) -> Result<()> {
    validate_at("", schema, props)
}

fn validate_at(path: &str, schema: &Schema, props: &Properties) -> Result<()> {
    let qualified = |key: &str| {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{path}.{key}")
        }
    };

    for (key, _) in props.iter() {
        if !schema.contains_key(key.as_str()) {
            return Err(CodecError::validation("schema", qualified(key), "undeclared field"));
        }
    }

    for (key, field) in schema {
        let Some(value) = props.get(key) else {
            if field.required {
                return Err(CodecError::validation("schema", qualified(key), "required field is missing"));
            }
            continue;
        };

        for other in &field.conflicts_with {
            if props.contains_key(other) {
                return Err(CodecError::validation(
                    "schema",
                    qualified(key),
                    format!("conflicts with '{other}'"),
                ));
            }
        }
        for other in &field.required_with {
            if !props.contains_key(other) {
                return Err(CodecError::validation(
                    "schema",
                    qualified(key),
                    format!("requires '{other}'"),
                ));
            }
        }

        match (field.field_type, value) {
            (FieldType::String, Value::String(_))
            | (FieldType::Bool, Value::Bool(_))
            | (FieldType::Int, Value::Int(_))
            | (FieldType::Float, Value::Float(_) | Value::Int(_)) => {}
            (FieldType::List, Value::List(items)) => {
                if field.min_items.is_some_and(|min| items.len() < min) {
                    return Err(CodecError::validation("schema", qualified(key), "too few items"));
                }
                if field.max_items.is_some_and(|max| items.len() > max) {
                    return Err(CodecError::validation("schema", qualified(key), "too many items"));
                }
                for (idx, item) in items.iter().enumerate() {
                    let item_path = format!("{}.{idx}", qualified(key));
                    match (&field.elem, item) {
                        (Some(Elem::Resource(nested)), Value::Block(block)) => {
                            validate_at(&item_path, nested, block)?;
                        }
                        (Some(Elem::Type(FieldType::String)), Value::String(_)) | (None, _) => {}
                        _ => return Err(CodecError::type_mismatch(item_path, "list element")),
                    }
                }
            }
            (expected, _) => {
                return Err(CodecError::type_mismatch(qualified(key), type_label(expected)));
            }
        }
    }
    Ok(())
}

fn type_label(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::String => "string",
        FieldType::Bool => "bool",
        FieldType::Int => "int",
        FieldType::Float => "float",
        FieldType::List => "list",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slo_like() -> Schema {
        let mut schema = Schema::new();
        schema.insert("name", FieldSchema::string("name").required());
        schema.insert("target", FieldSchema::float("target").required());
        schema.insert(
            "rate",
            FieldSchema::string("rate").conflicts_with(&["numerator", "denominator"]),
        );
        schema.insert(
            "numerator",
            FieldSchema::string("numerator").required_with(&["denominator"]),
        );
        schema.insert("denominator", FieldSchema::string("denominator"));
        schema.insert("tags", FieldSchema::string_list("tags").max_items(1));
        schema
    }

    fn props(pairs: &[(&str, Value)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn accepts_valid_tree() {
        let tree = props(&[("name", Value::from("a")), ("target", Value::Int(95)), ("rate", Value::from("m"))]);
        validate(&slo_like(), &tree).unwrap();
    }

    #[test]
    fn rejects_missing_required() {
        let tree = props(&[("target", Value::Float(1.0))]);
        let err = validate(&slo_like(), &tree).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn rejects_conflicting_fields() {
        let tree = props(&[
            ("name", Value::from("a")),
            ("target", Value::Float(1.0)),
            ("rate", Value::from("m")),
            ("numerator", Value::from("n")),
            ("denominator", Value::from("d")),
        ]);
        let err = validate(&slo_like(), &tree).unwrap_err();
        assert!(err.to_string().contains("conflicts"));
    }

    #[test]
    fn rejects_missing_companion_field() {
        let tree = props(&[
            ("name", Value::from("a")),
            ("target", Value::Float(1.0)),
            ("numerator", Value::from("n")),
        ]);
        let err = validate(&slo_like(), &tree).unwrap_err();
        assert!(err.to_string().contains("requires 'denominator'"));
    }

    #[test]
    fn rejects_wrong_type_and_list_bounds() {
        let tree = props(&[("name", Value::Bool(true)), ("target", Value::Float(1.0))]);
        assert!(matches!(
            validate(&slo_like(), &tree),
            Err(CodecError::TypeMismatch { .. })
        ));

        let tree = props(&[
            ("name", Value::from("a")),
            ("target", Value::Float(1.0)),
            ("tags", Value::List(vec![Value::from("x"), Value::from("y")])),
        ]);
        assert!(validate(&slo_like(), &tree).is_err());
    }

    #[test]
    fn rejects_undeclared_field() {
        let tree = props(&[("name", Value::from("a")), ("target", Value::Float(1.0)), ("bogus", Value::from("x"))]);
        let err = validate(&slo_like(), &tree).unwrap_err();
        assert!(err.to_string().contains("undeclared"));
    }
}
