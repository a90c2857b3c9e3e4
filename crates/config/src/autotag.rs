//! Auto-tag rules.
//!
//! A rule selects entities of one [`RuleType`] whose conditions all match.
//! Condition order is not significant to the API, so the schema encoding
//! sorts conditions by their canonical JSON to keep the tree stable.

use monconf_core::json::{self, RawMap};
use monconf_core::schema::{
    Decoder, DecoderExt, FieldSchema, NestedDecoder, Properties, Resource, Schema, Value,
    UNKNOWNS_KEY,
};
use monconf_core::unknowns::{self, Unknowns};
use monconf_core::{CodecError, JsonCodec, Result};
use tracing::trace;

use crate::condition::Condition;
use crate::domain::parse_in;

const KNOWN_FIELDS: &[&str] = &[
    "type",
    "enabled",
    "propagationTypes",
    "conditions",
    "valueFormat",
    "normalization",
];

const VARIANT: &str = "autotag rule";

string_enum! {
    /// Kind of entity a rule is evaluated against.
    pub enum RuleType {
        Application => "APPLICATION",
        AwsApplicationLoadBalancer => "AWS_APPLICATION_LOAD_BALANCER",
        AwsClassicLoadBalancer => "AWS_CLASSIC_LOAD_BALANCER",
        AwsNetworkLoadBalancer => "AWS_NETWORK_LOAD_BALANCER",
        AwsRelationalDatabaseService => "AWS_RELATIONAL_DATABASE_SERVICE",
        Azure => "AZURE",
        CustomApplication => "CUSTOM_APPLICATION",
        CustomDevice => "CUSTOM_DEVICE",
        DcrumApplication => "DCRUM_APPLICATION",
        EsxiHost => "ESXI_HOST",
        ExternalSyntheticTest => "EXTERNAL_SYNTHETIC_TEST",
        Host => "HOST",
        HttpCheck => "HTTP_CHECK",
        MobileApplication => "MOBILE_APPLICATION",
        ProcessGroup => "PROCESS_GROUP",
        Service => "SERVICE",
        SyntheticTest => "SYNTHETIC_TEST",
    }
}

string_enum! {
    /// How a tag spreads from matching entities to related ones.
    pub enum PropagationType {
        ServiceToProcessGroupLike => "SERVICE_TO_PROCESS_GROUP_LIKE",
        ServiceToHostLike => "SERVICE_TO_HOST_LIKE",
        ProcessGroupToHost => "PROCESS_GROUP_TO_HOST",
        ProcessGroupToService => "PROCESS_GROUP_TO_SERVICE",
        HostToProcessGroupInstance => "HOST_TO_PROCESS_GROUP_INSTANCE",
        CustomDeviceGroupToCustomDevice => "CUSTOM_DEVICE_GROUP_TO_CUSTOM_DEVICE",
        AzureToPg => "AZURE_TO_PG",
        AzureToService => "AZURE_TO_SERVICE",
    }
}

string_enum! {
    /// Case change applied after the value format.
    pub enum Normalization {
        LeaveTextAsIs => "LEAVE_TEXT_AS_IS",
        ToLowerCase => "TO_LOWER_CASE",
        ToUpperCase => "TO_UPPER_CASE",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub rule_type: RuleType,
    pub enabled: bool,
    pub propagation_types: Vec<PropagationType>,
    /// AND-combined.
    pub conditions: Vec<Condition>,
    /// Tag value template, e.g. `{Host:DetectedName}`.
    pub value_format: Option<String>,
    pub normalization: Option<Normalization>,
    pub unknowns: Unknowns,
}

impl Rule {
    pub fn new(rule_type: RuleType) -> Self {
        Self {
            rule_type,
            enabled: true,
            propagation_types: Vec::new(),
            conditions: Vec::new(),
            value_format: None,
            normalization: None,
            unknowns: Unknowns::new(),
        }
    }

    /// Copy with conditions in the order the schema encoding emits them.
    pub fn canonicalized(&self) -> Result<Self> {
        Ok(Self {
            conditions: canonical_order(&self.conditions)?,
            ..self.clone()
        })
    }
}

/// Sort by canonical JSON, then decode each condition again from that text.
fn canonical_order(conditions: &[Condition]) -> Result<Vec<Condition>> {
    let mut encoded = conditions
        .iter()
        .map(|c| c.to_canonical_json())
        .collect::<Result<Vec<_>>>()?;
    encoded.sort();
    trace!(count = encoded.len(), "sorted conditions by canonical encoding");
    encoded
        .iter()
        .map(|text| Condition::from_json(text.as_bytes()))
        .collect()
}

/// Rule fields as read from JSON; every one optional until the schema
/// path has applied its explicit keys.
#[derive(Default)]
struct Partial {
    rule_type: Option<RuleType>,
    enabled: Option<bool>,
    propagation_types: Option<Vec<PropagationType>>,
    conditions: Option<Vec<Condition>>,
    value_format: Option<String>,
    normalization: Option<Normalization>,
}

impl Partial {
    fn from_fields(fields: &RawMap) -> Result<Self> {
        let rule_type = json::string_field(fields, "type")?
            .map(|t| parse_in(&t, VARIANT, "type"))
            .transpose()?;
        let propagation_types = json::field::<Option<Vec<String>>>(fields, "propagationTypes", "list of strings")?
            .flatten()
            .map(|types| parse_all(&types, "propagationTypes"))
            .transpose()?;
        let conditions = json::field::<Option<Vec<RawMap>>>(fields, "conditions", "list of objects")?
            .flatten()
            .map(|raw| raw.into_iter().map(Condition::from_json_map).collect::<Result<Vec<_>>>())
            .transpose()?;
        let normalization = json::string_field(fields, "normalization")?
            .map(|n| parse_in(&n, VARIANT, "normalization"))
            .transpose()?;
        Ok(Self {
            rule_type,
            enabled: json::field::<Option<bool>>(fields, "enabled", "bool")?.flatten(),
            propagation_types,
            conditions,
            value_format: json::string_field(fields, "valueFormat")?,
            normalization,
        })
    }

    fn finish(self, unknowns: Unknowns) -> Result<Rule> {
        let rule_type = self
            .rule_type
            .ok_or_else(|| CodecError::validation(VARIANT, "type", "type is required"))?;
        Ok(Rule {
            rule_type,
            enabled: self.enabled.unwrap_or(false),
            propagation_types: self.propagation_types.unwrap_or_default(),
            conditions: self.conditions.unwrap_or_default(),
            value_format: self.value_format,
            normalization: self.normalization,
            unknowns,
        })
    }
}

fn parse_all(raw: &[String], field: &str) -> Result<Vec<PropagationType>> {
    raw.iter().map(|t| parse_in(t, VARIANT, field)).collect()
}

impl JsonCodec for Rule {
    fn from_json_map(raw: RawMap) -> Result<Self> {
        let (fields, residual) = unknowns::split(raw, KNOWN_FIELDS);
        Partial::from_fields(&fields)?.finish(residual)
    }

    fn to_json_map(&self) -> Result<RawMap> {
        let mut fields = RawMap::new();
        json::put(&mut fields, "type", self.rule_type.as_str())?;
        json::put(&mut fields, "enabled", &self.enabled)?;
        if !self.propagation_types.is_empty() {
            let types: Vec<&str> = self.propagation_types.iter().map(|t| t.as_str()).collect();
            json::put(&mut fields, "propagationTypes", &types)?;
        }
        if !self.conditions.is_empty() {
            let conditions = self
                .conditions
                .iter()
                .map(|c| c.to_json_map())
                .collect::<Result<Vec<_>>>()?;
            json::put(&mut fields, "conditions", &conditions)?;
        }
        if let Some(format) = &self.value_format {
            json::put(&mut fields, "valueFormat", format)?;
        }
        if let Some(normalization) = &self.normalization {
            json::put(&mut fields, "normalization", normalization.as_str())?;
        }
        Ok(unknowns::merge(fields, &self.unknowns))
    }
}

impl Resource for Rule {
    fn schema() -> Schema {
        let mut schema = Schema::new();
        schema.insert(
            "type",
            FieldSchema::string("The type of Dynatrace entities the auto-tag can be applied to").required(),
        );
        schema.insert(
            "enabled",
            FieldSchema::bool("The rule is enabled (`true`) or disabled (`false`)"),
        );
        schema.insert(
            "propagation_types",
            FieldSchema::string_list("How to apply the auto-tag to underlying entities"),
        );
        schema.insert(
            "conditions",
            FieldSchema::block_list(
                "A list of matching rules for the auto-tag. The auto-tag applies only if **all** conditions are fulfilled",
                Condition::schema(),
            )
            .min_items(1),
        );
        schema.insert(
            "value_format",
            FieldSchema::string("The value of the auto-tag. If specified, the tag is used in the `name:valueFormat` format"),
        );
        schema.insert(
            "normalization",
            FieldSchema::string(
                "Changes applied to the value after applying the value format. Possible values are `LEAVE_TEXT_AS_IS`, `TO_LOWER_CASE` and `TO_UPPER_CASE`. Default is `LEAVE_TEXT_AS_IS`",
            ),
        );
        schema.insert(UNKNOWNS_KEY, FieldSchema::unknowns());
        schema
    }

    fn to_properties(&self) -> Result<Properties> {
        let mut props = Properties::new();
        props.insert_opt(UNKNOWNS_KEY, self.unknowns.to_blob()?);
        props.insert("enabled", self.enabled);
        props.insert("type", self.rule_type.as_str());
        if !self.propagation_types.is_empty() {
            let types: Vec<Value> = self
                .propagation_types
                .iter()
                .map(|t| Value::from(t.as_str()))
                .collect();
            props.insert("propagation_types", types);
        }
        if !self.conditions.is_empty() {
            let conditions = canonical_order(&self.conditions)?
                .iter()
                .map(|c| c.to_properties().map(Value::Block))
                .collect::<Result<Vec<_>>>()?;
            props.insert("conditions", conditions);
        }
        props.insert_opt("value_format", self.value_format.clone());
        props.insert_opt("normalization", self.normalization.map(|n| n.as_str()));
        Ok(props)
    }

    fn from_decoder(decoder: &dyn Decoder) -> Result<Self> {
        let mut partial = Partial::default();
        let mut residual = Unknowns::new();
        if let Some(blob) = decoder.get_string(UNKNOWNS_KEY)? {
            let (fields, rest) = unknowns::split(unknowns::parse_blob(&blob)?, KNOWN_FIELDS);
            partial = Partial::from_fields(&fields)?;
            residual = rest;
        }
        if let Some(t) = decoder.get_string("type")? {
            partial.rule_type = Some(parse_in(&t, VARIANT, "type")?);
        }
        if let Some(enabled) = decoder.get_bool_change("enabled")? {
            partial.enabled = Some(enabled);
        }
        if let Some(types) = decoder.get_string_list("propagation_types")? {
            partial.propagation_types = Some(parse_all(&types, "propagation_types")?);
        }
        if let Some(count) = decoder.get_count("conditions")? {
            let conditions = (0..count)
                .map(|idx| Condition::from_decoder(&NestedDecoder::new(decoder, "conditions", idx)))
                .collect::<Result<Vec<_>>>()?;
            partial.conditions = Some(conditions);
        }
        if let Some(format) = decoder.get_string("value_format")? {
            partial.value_format = Some(format);
        }
        if let Some(n) = decoder.get_string("normalization")? {
            partial.normalization = Some(parse_in(&n, VARIANT, "normalization")?);
        }
        partial.finish(residual)
    }
}
