//! Static registry of comparison variants.

use monconf_core::json::RawMap;
use monconf_core::schema::{Decoder, Resource, Schema};
use monconf_core::{CodecError, JsonCodec, Result};
use tracing::debug;

use crate::domain::Domain;

use super::{
    AzureComputeMode, Comparison, CustomApplicationType, IndexedName, IndexedString, PaasType,
    ServiceType, Shape, SyntheticEngineType, TypedComparison,
};

string_enum! {
    /// Discriminator of a comparison, written as `type` on the wire.
    pub enum ComparisonType {
        CustomApplicationType => "CUSTOM_APPLICATION_TYPE",
        SyntheticEngineType => "SYNTHETIC_ENGINE_TYPE",
        IndexedName => "INDEXED_NAME",
        IndexedString => "INDEXED_STRING",
        PaasType => "PAAS_TYPE",
        AzureComputeMode => "AZURE_COMPUTE_MODE",
        ServiceType => "SERVICE_TYPE",
    }
}

impl ComparisonType {
    /// Registry entry of this variant.
    pub fn codec(&self) -> &'static VariantCodec {
        // REGISTRY is declared in the same order as the enum.
        &REGISTRY[*self as usize]
    }

    /// Name of the nested block carrying this variant in a condition.
    pub fn block_name(&self) -> &'static str {
        self.codec().block_name
    }
}

/// Capability set of one variant.
///
/// Encoding needs no entry here: it dispatches on the closed [`Comparison`]
/// enum. Decoding starts from a discriminator, so it goes through the table.
pub struct VariantCodec {
    pub comparison_type: ComparisonType,
    pub block_name: &'static str,
    /// Legal operators.
    pub operators: &'static [&'static str],
    /// Legal values; empty for free-text variants.
    pub values: &'static [&'static str],
    decode_json: fn(RawMap) -> Result<Comparison>,
    decode_schema: fn(&dyn Decoder) -> Result<Comparison>,
    schema: fn() -> Schema,
}

impl VariantCodec {
    pub fn decode_json(&self, raw: RawMap) -> Result<Comparison> {
        (self.decode_json)(raw)
    }

    pub fn decode_schema(&self, decoder: &dyn Decoder) -> Result<Comparison> {
        (self.decode_schema)(decoder)
    }

    pub fn schema(&self) -> Schema {
        (self.schema)()
    }

    pub fn is_free_text(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for VariantCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantCodec")
            .field("comparison_type", &self.comparison_type)
            .field("block_name", &self.block_name)
            .field("operators", &self.operators)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

fn decode_json<S: Shape>(raw: RawMap) -> Result<Comparison> {
    TypedComparison::<S>::from_json_map(raw).map(S::wrap)
}

fn decode_schema<S: Shape>(decoder: &dyn Decoder) -> Result<Comparison> {
    TypedComparison::<S>::from_decoder(decoder).map(S::wrap)
}

fn schema<S: Shape>() -> Schema {
    TypedComparison::<S>::schema()
}

macro_rules! registry {
    ($($shape:ident => $block:literal),+ $(,)?) => {
        [$(
            VariantCodec {
                comparison_type: <$shape as Shape>::TYPE,
                block_name: $block,
                operators: <<$shape as Shape>::Operator as Domain>::ALLOWED,
                values: <<$shape as Shape>::Value as Domain>::ALLOWED,
                decode_json: decode_json::<$shape>,
                decode_schema: decode_schema::<$shape>,
                schema: schema::<$shape>,
            }
        ),+]
    };
}

static REGISTRY: [VariantCodec; 7] = registry! {
    CustomApplicationType => "custom_application_type",
    SyntheticEngineType => "synthetic_engine_type",
    IndexedName => "indexed_name",
    IndexedString => "indexed_string",
    PaasType => "paas_type",
    AzureComputeMode => "azure_compute_mode",
    ServiceType => "service_type",
};

/// Look up a variant by its discriminator.
pub fn resolve(discriminator: &str) -> Result<&'static VariantCodec> {
    match REGISTRY
        .iter()
        .find(|codec| codec.comparison_type.as_str() == discriminator)
    {
        Some(codec) => Ok(codec),
        None => {
            debug!(discriminator, "comparison variant not registered");
            Err(CodecError::UnknownVariant(discriminator.to_string()))
        }
    }
}

/// Look up a variant by the name of its nested schema block.
pub fn resolve_block(block_name: &str) -> Option<&'static VariantCodec> {
    REGISTRY.iter().find(|codec| codec.block_name == block_name)
}

/// Every registered variant, in declaration order.
pub fn variants() -> &'static [VariantCodec] {
    &REGISTRY
}
