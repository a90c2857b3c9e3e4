//! Conversions behind the `convert` and `schema` subcommands.

use std::io::Read;

use anyhow::{anyhow, Context, Result};
use monconf_config::{comparison, Comparison, Condition, Rule, Slo};
use monconf_core::schema::{self, Properties, Resource, Schema, TreeDecoder, Value};
use monconf_core::JsonCodec;

use crate::cli::Kind;

/// Read a file, or stdin for `-`.
pub fn read_input(input: &str) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    if input == "-" {
        std::io::stdin()
            .read_to_end(&mut data)
            .context("failed to read stdin")?;
    } else {
        data = std::fs::read(input).with_context(|| format!("failed to read '{input}'"))?;
    }
    Ok(data)
}

/// Decode a REST payload and encode it as a schema tree.
pub fn json_to_schema(kind: Kind, json: &[u8]) -> Result<Properties> {
    let props = match kind {
        Kind::Comparison => Comparison::from_json(json)?.to_properties()?,
        Kind::Condition => Condition::from_json(json)?.to_properties()?,
        Kind::AutotagRule => Rule::from_json(json)?.to_properties()?,
        Kind::Slo => Slo::from_json(json)?.to_properties()?,
    };
    Ok(props)
}

/// Validate a schema tree, decode it and encode the REST payload.
///
/// A comparison tree names its variant through `variant` or, failing that,
/// its own `type` key.
pub fn schema_to_json(kind: Kind, tree: &[u8], variant: Option<&str>) -> Result<String> {
    let props: Properties =
        serde_json::from_slice(tree).context("schema tree must be a JSON object")?;
    let variant = variant.map(str::to_string).or_else(|| match props.get("type") {
        Some(Value::String(tag)) if kind == Kind::Comparison => Some(tag.clone()),
        _ => None,
    });
    schema::validate(&schema_for(kind, variant.as_deref())?, &props)?;

    let decoder = TreeDecoder::new(&props);
    let json = match kind {
        Kind::Comparison => {
            let tag = variant.ok_or_else(|| anyhow!("comparison trees need --variant"))?;
            comparison::resolve(&tag)?.decode_schema(&decoder)?.to_json()?
        }
        Kind::Condition => Condition::from_decoder(&decoder)?.to_json()?,
        Kind::AutotagRule => Rule::from_decoder(&decoder)?.to_json()?,
        Kind::Slo => Slo::from_decoder(&decoder)?.to_json()?,
    };
    Ok(json)
}

pub fn schema_for(kind: Kind, variant: Option<&str>) -> Result<Schema> {
    let schema = match kind {
        Kind::Comparison => {
            let tag = variant.ok_or_else(|| anyhow!("comparison schemas need --variant"))?;
            comparison::resolve(tag)?.schema()
        }
        Kind::Condition => Condition::schema(),
        Kind::AutotagRule => Rule::schema(),
        Kind::Slo => Slo::schema(),
    };
    Ok(schema)
}
