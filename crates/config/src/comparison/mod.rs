//! Comparison variants and their bidirectional codec.
//!
//! A comparison is a typed predicate over one entity attribute. The closed
//! set of variants is enumerated by [`ComparisonType`]; each variant is a
//! [`Shape`] declaring its operator enum and value domain, and
//! [`TypedComparison`] implements the four conversions once for all shapes.

mod registry;
mod variants;

#[cfg(test)]
mod tests;

pub use registry::*;
pub use variants::*;

use monconf_core::json::{self, RawMap};
use monconf_core::schema::{Decoder, DecoderExt, FieldSchema, Properties, Resource, Schema, UNKNOWNS_KEY};
use monconf_core::unknowns::{self, Unknowns};
use monconf_core::{CodecError, JsonCodec, Result};

use crate::domain::{parse_in, Domain};

/// Wire name of the existence-only operator.
pub const EXISTS: &str = "EXISTS";

/// Keys a comparison reserves on the JSON wire.
const KNOWN_FIELDS: &[&str] = &["type", "negate", "operator", "value"];

/// Operator enum of a variant.
pub trait ComparisonOperator: Domain + Copy {
    /// Existence-only operators never carry a value.
    fn is_existence(&self) -> bool {
        self.as_str() == EXISTS
    }
}

/// Static description of one comparison variant.
pub trait Shape: std::fmt::Debug + Copy + PartialEq + 'static {
    const TYPE: ComparisonType;
    const OPERATOR_DOC: &'static str;
    const VALUE_DOC: &'static str;

    type Operator: ComparisonOperator;
    type Value: Domain;

    fn wrap(comparison: TypedComparison<Self>) -> Comparison;
}

/// A comparison of one concrete variant.
///
/// The discriminator is not stored: it is `S::TYPE`, written as a constant
/// on every encode.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedComparison<S: Shape> {
    negate: bool,
    operator: S::Operator,
    value: Option<S::Value>,
    unknowns: Unknowns,
}

impl<S: Shape> TypedComparison<S> {
    /// Build a comparison; `value` is dropped for existence operators.
    pub fn new(negate: bool, operator: S::Operator, value: Option<S::Value>) -> Self {
        let value = if operator.is_existence() { None } else { value };
        Self {
            negate,
            operator,
            value,
            unknowns: Unknowns::new(),
        }
    }

    pub fn with_unknowns(mut self, unknowns: Unknowns) -> Self {
        self.unknowns = unknowns;
        self
    }

    pub fn comparison_type(&self) -> ComparisonType {
        S::TYPE
    }

    pub fn negate(&self) -> bool {
        self.negate
    }

    pub fn operator(&self) -> S::Operator {
        self.operator
    }

    pub fn value(&self) -> Option<&S::Value> {
        self.value.as_ref()
    }

    pub fn unknowns(&self) -> &Unknowns {
        &self.unknowns
    }

    pub fn unknowns_mut(&mut self) -> &mut Unknowns {
        &mut self.unknowns
    }
}

/// Known fields read from JSON before explicit schema keys are applied.
struct Seed<S: Shape> {
    negate: Option<bool>,
    operator: Option<S::Operator>,
    value: Option<S::Value>,
}

impl<S: Shape> Seed<S> {
    fn empty() -> Self {
        Self {
            negate: None,
            operator: None,
            value: None,
        }
    }

    fn from_fields(fields: &RawMap) -> Result<Self> {
        if let Some(tag) = json::string_field(fields, "type")? {
            check_discriminator::<S>(&tag)?;
        }
        let negate = json::field::<Option<bool>>(fields, "negate", "bool")?.flatten();
        let operator = json::string_field(fields, "operator")?
            .map(|op| parse_in(&op, S::TYPE.as_str(), "operator"))
            .transpose()?;
        let value = json::string_field(fields, "value")?
            .map(|v| parse_in(&v, S::TYPE.as_str(), "value"))
            .transpose()?;
        Ok(Self {
            negate,
            operator,
            value,
        })
    }

    fn finish(self, unknowns: Unknowns) -> Result<TypedComparison<S>> {
        let operator = self.operator.ok_or_else(|| {
            CodecError::validation(S::TYPE.as_str(), "operator", "operator is required")
        })?;
        Ok(TypedComparison::new(self.negate.unwrap_or(false), operator, self.value)
            .with_unknowns(unknowns))
    }
}

fn check_discriminator<S: Shape>(tag: &str) -> Result<()> {
    if tag == S::TYPE.as_str() {
        Ok(())
    } else {
        Err(CodecError::validation(
            S::TYPE.as_str(),
            "type",
            format!("expected '{}', found '{tag}'", S::TYPE),
        ))
    }
}

impl<S: Shape> JsonCodec for TypedComparison<S> {
    fn from_json_map(raw: RawMap) -> Result<Self> {
        let (fields, unknowns) = unknowns::split(raw, KNOWN_FIELDS);
        Seed::<S>::from_fields(&fields)?.finish(unknowns)
    }

    fn to_json_map(&self) -> Result<RawMap> {
        let mut fields = RawMap::new();
        json::put(&mut fields, "negate", &self.negate)?;
        json::put(&mut fields, "type", S::TYPE.as_str())?;
        json::put(&mut fields, "operator", self.operator.as_str())?;
        if let Some(value) = self.value() {
            json::put(&mut fields, "value", value.as_str())?;
        }
        Ok(unknowns::merge(fields, &self.unknowns))
    }
}

impl<S: Shape> Resource for TypedComparison<S> {
    fn schema() -> Schema {
        let mut schema = Schema::new();
        schema.insert(
            "type",
            FieldSchema::string("if specified, needs to match the comparison's own type")
                .deprecated("The value of the attribute type is implicit, therefore shouldn't get specified"),
        );
        schema.insert(
            "negate",
            FieldSchema::bool("Reverses the operator. For example it turns EQUALS into DOES NOT EQUAL"),
        );
        schema.insert("operator", FieldSchema::string(S::OPERATOR_DOC).required());
        schema.insert("value", FieldSchema::string(S::VALUE_DOC));
        schema.insert(UNKNOWNS_KEY, FieldSchema::unknowns());
        schema
    }

    fn to_properties(&self) -> Result<Properties> {
        let mut props = Properties::new();
        props.insert_opt(UNKNOWNS_KEY, self.unknowns.to_blob()?);
        props.insert("negate", self.negate);
        props.insert("operator", self.operator.as_str());
        props.insert_opt("value", self.value().map(|v| v.as_str().to_string()));
        Ok(props)
    }

    /// Precedence: the `unknowns` blob seeds every field first, explicit
    /// keys then override it, anything left keeps its zero value.
    fn from_decoder(decoder: &dyn Decoder) -> Result<Self> {
        let mut seed = Seed::<S>::empty();
        let mut residual = Unknowns::new();
        if let Some(blob) = decoder.get_string(UNKNOWNS_KEY)? {
            let (fields, rest) = unknowns::split(unknowns::parse_blob(&blob)?, KNOWN_FIELDS);
            seed = Seed::from_fields(&fields)?;
            residual = rest;
        }
        if let Some(tag) = decoder.get_string("type")? {
            check_discriminator::<S>(&tag)?;
        }
        if let Some(negate) = decoder.get_bool_change("negate")? {
            seed.negate = Some(negate);
        }
        if let Some(op) = decoder.get_string("operator")? {
            seed.operator = Some(parse_in(&op, S::TYPE.as_str(), "operator")?);
        }
        if let Some(value) = decoder.get_string("value")? {
            seed.value = Some(parse_in(&value, S::TYPE.as_str(), "value")?);
        }
        seed.finish(residual)
    }
}

macro_rules! each_variant {
    ($comparison:expr, $inner:ident => $body:expr) => {
        match $comparison {
            Comparison::CustomApplicationType($inner) => $body,
            Comparison::SyntheticEngineType($inner) => $body,
            Comparison::IndexedName($inner) => $body,
            Comparison::IndexedString($inner) => $body,
            Comparison::PaasType($inner) => $body,
            Comparison::AzureComputeMode($inner) => $body,
            Comparison::ServiceType($inner) => $body,
        }
    };
}

/// A comparison of any supported variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    CustomApplicationType(TypedComparison<CustomApplicationType>),
    SyntheticEngineType(TypedComparison<SyntheticEngineType>),
    IndexedName(TypedComparison<IndexedName>),
    IndexedString(TypedComparison<IndexedString>),
    PaasType(TypedComparison<PaasType>),
    AzureComputeMode(TypedComparison<AzureComputeMode>),
    ServiceType(TypedComparison<ServiceType>),
}

impl Comparison {
    /// The discriminator of this instance.
    pub fn comparison_type(&self) -> ComparisonType {
        each_variant!(self, c => c.comparison_type())
    }

    pub fn negate(&self) -> bool {
        each_variant!(self, c => c.negate())
    }

    pub fn operator(&self) -> &str {
        each_variant!(self, c => c.operator.as_str())
    }

    pub fn value(&self) -> Option<&str> {
        each_variant!(self, c => c.value().map(|v| v.as_str()))
    }

    pub fn unknowns(&self) -> &Unknowns {
        each_variant!(self, c => c.unknowns())
    }

    /// Codec registered for this instance's variant.
    pub fn codec(&self) -> &'static VariantCodec {
        self.comparison_type().codec()
    }

    /// Encode into the nested block of this variant.
    pub fn to_properties(&self) -> Result<Properties> {
        each_variant!(self, c => c.to_properties())
    }
}

impl JsonCodec for Comparison {
    /// Peek at `type`, resolve the variant, then delegate.
    fn from_json_map(raw: RawMap) -> Result<Self> {
        let tag = json::string_field(&raw, "type")?.ok_or_else(|| {
            CodecError::validation("comparison", "type", "missing discriminator")
        })?;
        resolve(&tag)?.decode_json(raw)
    }

    fn to_json_map(&self) -> Result<RawMap> {
        each_variant!(self, c => c.to_json_map())
    }
}
