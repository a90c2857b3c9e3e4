//! Condition envelope: one attribute key plus one comparison.
//!
//! On the wire a condition is `{"key": "...", "comparisonInfo": {...}}`; the
//! nested `type` selects the comparison variant. In the schema tree the
//! comparison sits in a nested block named after its variant.

use monconf_core::json::{self, RawMap};
use monconf_core::schema::{
    Decoder, DecoderExt, FieldSchema, NestedDecoder, Properties, Resource, Schema, Value,
    UNKNOWNS_KEY,
};
use monconf_core::unknowns::{self, Unknowns};
use monconf_core::{CodecError, JsonCodec, Result};

use crate::comparison::{self, Comparison};

const KNOWN_FIELDS: &[&str] = &["key", "comparisonInfo"];

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    key: String,
    comparison: Comparison,
    unknowns: Unknowns,
}

impl Condition {
    pub fn new(key: impl Into<String>, comparison: Comparison) -> Self {
        Self {
            key: key.into(),
            comparison,
            unknowns: Unknowns::new(),
        }
    }

    pub fn with_unknowns(mut self, unknowns: Unknowns) -> Self {
        self.unknowns = unknowns;
        self
    }

    /// Attribute the comparison applies to.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn comparison(&self) -> &Comparison {
        &self.comparison
    }

    pub fn unknowns(&self) -> &Unknowns {
        &self.unknowns
    }

    pub fn unknowns_mut(&mut self) -> &mut Unknowns {
        &mut self.unknowns
    }
}

fn missing(field: &str) -> CodecError {
    CodecError::validation("condition", field, format!("{field} is required"))
}

/// Known fields of a JSON condition; both optional until the schema
/// path has applied its explicit keys.
fn seed_from_fields(fields: &RawMap) -> Result<(Option<String>, Option<Comparison>)> {
    let key = json::string_field(fields, "key")?;
    let comparison = json::field::<Option<RawMap>>(fields, "comparisonInfo", "object")?
        .flatten()
        .map(Comparison::from_json_map)
        .transpose()?;
    Ok((key, comparison))
}

impl JsonCodec for Condition {
    /// The comparison's discriminator is resolved before the comparison
    /// itself is decoded; an unregistered one fails with `UnknownVariant`.
    fn from_json_map(raw: RawMap) -> Result<Self> {
        let (fields, residual) = unknowns::split(raw, KNOWN_FIELDS);
        let (key, comparison) = seed_from_fields(&fields)?;
        Ok(Self {
            key: key.ok_or_else(|| missing("key"))?,
            comparison: comparison.ok_or_else(|| missing("comparisonInfo"))?,
            unknowns: residual,
        })
    }

    fn to_json_map(&self) -> Result<RawMap> {
        let mut fields = RawMap::new();
        json::put(&mut fields, "key", &self.key)?;
        json::put_raw(&mut fields, "comparisonInfo", self.comparison.to_json()?)?;
        Ok(unknowns::merge(fields, &self.unknowns))
    }
}

impl Resource for Condition {
    fn schema() -> Schema {
        let mut schema = Schema::new();
        schema.insert(
            "key",
            FieldSchema::string("The key of the attribute, which need to be compared").required(),
        );
        let blocks: Vec<&'static str> = comparison::variants().iter().map(|c| c.block_name).collect();
        for codec in comparison::variants() {
            let others: Vec<&'static str> =
                blocks.iter().copied().filter(|b| *b != codec.block_name).collect();
            schema.insert(
                codec.block_name,
                FieldSchema::block_list("Comparison of one attribute of the monitored entity", codec.schema())
                    .max_items(1)
                    .conflicts_with(&others),
            );
        }
        schema.insert(UNKNOWNS_KEY, FieldSchema::unknowns());
        schema
    }

    fn to_properties(&self) -> Result<Properties> {
        let mut props = Properties::new();
        props.insert_opt(UNKNOWNS_KEY, self.unknowns.to_blob()?);
        props.insert("key", self.key.as_str());
        props.insert(
            self.comparison.comparison_type().block_name(),
            vec![Value::Block(self.comparison.to_properties()?)],
        );
        Ok(props)
    }

    fn from_decoder(decoder: &dyn Decoder) -> Result<Self> {
        let (mut key, mut comparison, mut residual) = (None, None, Unknowns::new());
        if let Some(blob) = decoder.get_string(UNKNOWNS_KEY)? {
            let (fields, rest) = unknowns::split(unknowns::parse_blob(&blob)?, KNOWN_FIELDS);
            (key, comparison) = seed_from_fields(&fields)?;
            residual = rest;
        }
        if let Some(explicit) = decoder.get_string("key")? {
            key = Some(explicit);
        }
        let mut present = Vec::new();
        for codec in comparison::variants() {
            if decoder.get_count(codec.block_name)?.unwrap_or(0) > 0 {
                present.push(codec);
            }
        }
        match present.as_slice() {
            [] => {}
            [codec] => {
                let nested = NestedDecoder::new(decoder, codec.block_name, 0);
                comparison = Some(codec.decode_schema(&nested)?);
            }
            [first, second, ..] => {
                return Err(CodecError::validation(
                    "condition",
                    second.block_name,
                    format!("conflicts with '{}'; a condition holds exactly one comparison", first.block_name),
                ));
            }
        }
        Ok(Self {
            key: key.ok_or_else(|| missing("key"))?,
            comparison: comparison.ok_or_else(|| missing("comparison"))?,
            unknowns: residual,
        })
    }
}

#[cfg(test)]
mod tests {
    use monconf_core::schema::TreeDecoder;

    use super::*;
    use crate::comparison::{indexed_name, service_type, IndexedName, ServiceType, Shape, TypedComparison};

    fn host_name_condition() -> Condition {
        Condition::new(
            "HOST_NAME",
            IndexedName::wrap(TypedComparison::new(
                false,
                indexed_name::Operator::Contains,
                Some("prod".to_string()),
            )),
        )
    }

    #[test]
    fn json_round_trip() {
        let condition = host_name_condition();
        let json = condition.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"comparisonInfo":{"negate":false,"operator":"CONTAINS","type":"INDEXED_NAME","value":"prod"},"key":"HOST_NAME"}"#
        );
        assert_eq!(Condition::from_json(json.as_bytes()).unwrap(), condition);
    }

    #[test]
    fn schema_round_trip() {
        let condition = host_name_condition();
        let props = condition.to_properties().unwrap();
        assert_eq!(props.lookup("indexed_name.#"), Some(Value::Int(1)));
        assert_eq!(
            props.lookup("indexed_name.0.operator"),
            Some(Value::from("CONTAINS"))
        );
        monconf_core::schema::validate(&Condition::schema(), &props).unwrap();
        assert_eq!(Condition::from_properties(&props).unwrap(), condition);
    }

    #[test]
    fn unknown_fields_survive_both_paths() {
        let json = br#"{"key":"SERVICE_TYPE","futureField":"x","comparisonInfo":{"type":"SERVICE_TYPE","operator":"EXISTS","futureField":"y"}}"#;
        let condition = Condition::from_json(json).unwrap();
        assert_eq!(condition.unknowns().len(), 1);
        assert_eq!(condition.comparison().unknowns().len(), 1);

        let out = condition.to_json().unwrap();
        assert!(out.contains(r#""futureField":"x""#));
        assert!(out.contains(r#""futureField":"y""#));

        let props = condition.to_properties().unwrap();
        assert_eq!(props.get(UNKNOWNS_KEY), Some(&Value::from(r#"{"futureField":"x"}"#)));
        let back = Condition::from_properties(&props).unwrap();
        assert_eq!(back, condition);
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let json = br#"{"key":"HOST_TECH","comparisonInfo":{"type":"SIMPLE_TECH","operator":"EQUALS"}}"#;
        let err = Condition::from_json(json).unwrap_err();
        assert!(matches!(err, CodecError::UnknownVariant(ref tag) if tag == "SIMPLE_TECH"));
    }

    #[test]
    fn missing_comparison_is_rejected() {
        let err = Condition::from_json(br#"{"key":"HOST_NAME"}"#).unwrap_err();
        assert!(matches!(err, CodecError::Validation { ref field, .. } if field == "comparisonInfo"));

        let mut props = Properties::new();
        props.insert("key", "HOST_NAME");
        assert!(Condition::from_properties(&props).is_err());
    }

    #[test]
    fn non_object_comparison_is_a_type_mismatch() {
        let err = Condition::from_json(br#"{"key":"HOST_NAME","comparisonInfo":"EQUALS"}"#).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
    }

    #[test]
    fn explicit_block_overrides_blob_comparison() {
        let mut comparison = Properties::new();
        comparison.insert("operator", "EQUALS");
        comparison.insert("value", "WEB_SERVICE");

        let mut props = Properties::new();
        props.insert(
            UNKNOWNS_KEY,
            r#"{"key":"SERVICE_TYPE","comparisonInfo":{"type":"INDEXED_NAME","operator":"EXISTS"}}"#,
        );
        props.insert("service_type", vec![Value::Block(comparison)]);

        let condition = Condition::from_decoder(&TreeDecoder::new(&props)).unwrap();
        assert_eq!(condition.key(), "SERVICE_TYPE");
        assert_eq!(
            condition.comparison(),
            &ServiceType::wrap(TypedComparison::new(
                false,
                service_type::Operator::Equals,
                Some(service_type::Value::WebService),
            ))
        );
        assert!(condition.unknowns().is_empty());
    }

    #[test]
    fn second_comparison_block_is_rejected() {
        let mut exists = Properties::new();
        exists.insert("operator", "EXISTS");
        let mut equals = Properties::new();
        equals.insert("operator", "EQUALS");
        equals.insert("value", "WEB_SERVICE");

        let mut props = Properties::new();
        props.insert("key", "HOST_NAME");
        props.insert("indexed_name", vec![Value::Block(exists)]);
        props.insert("service_type", vec![Value::Block(equals)]);

        let err = monconf_core::schema::validate(&Condition::schema(), &props).unwrap_err();
        assert!(err.to_string().contains("conflicts with"));

        let err = Condition::from_properties(&props).unwrap_err();
        assert!(matches!(err, CodecError::Validation { ref field, .. } if field == "service_type"));
    }

    #[test]
    fn schema_declares_one_block_per_variant() {
        let schema = Condition::schema();
        for codec in comparison::variants() {
            assert_eq!(schema[codec.block_name].max_items, Some(1));
            assert_eq!(schema[codec.block_name].conflicts_with.len(), comparison::variants().len() - 1);
        }
        assert!(schema["key"].required);
    }
}
