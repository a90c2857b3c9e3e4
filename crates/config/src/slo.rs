//! Service-level objectives.
//!
//! An SLO has no variants. Its metric is either one percentage-based rate or
//! a numerator/denominator pair; the schema enforces that split through
//! `conflicts_with`/`required_with`, the entity itself accepts any mix.

use monconf_core::json::{self, RawMap};
use monconf_core::schema::{
    Decoder, DecoderExt, FieldSchema, Properties, Resource, Schema, UNKNOWNS_KEY,
};
use monconf_core::unknowns::{self, Unknowns};
use monconf_core::{CodecError, JsonCodec, Result};

const KNOWN_FIELDS: &[&str] = &[
    "name",
    "enabled",
    "description",
    "useRateMetric",
    "metricRate",
    "metricExpression",
    "metricNumerator",
    "metricDenominator",
    "evaluationType",
    "filter",
    "target",
    "warning",
    "timeframe",
];

const SPLIT_BY: &str = ":splitBy()";

#[derive(Debug, Clone, PartialEq)]
pub struct Slo {
    pub name: String,
    pub enabled: bool,
    pub description: Option<String>,
    /// Percentage-based metric.
    pub metric_rate: Option<String>,
    pub metric_expression: Option<String>,
    /// Count of successes.
    pub metric_numerator: Option<String>,
    /// Total count.
    pub metric_denominator: Option<String>,
    /// Currently only `AGGREGATE`.
    pub evaluation_type: String,
    /// Entity selector.
    pub filter: Option<String>,
    pub target: f64,
    pub warning: f64,
    pub timeframe: String,
    pub unknowns: Unknowns,
}

impl Slo {
    pub fn new(name: impl Into<String>, target: f64, warning: f64, timeframe: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            description: None,
            metric_rate: None,
            metric_expression: None,
            metric_numerator: None,
            metric_denominator: None,
            evaluation_type: "AGGREGATE".to_string(),
            filter: None,
            target,
            warning,
            timeframe: timeframe.into(),
            unknowns: Unknowns::new(),
        }
    }

    /// True when the SLO is computed from a single rate metric rather than
    /// a numerator/denominator pair.
    pub fn use_rate_metric(&self) -> bool {
        self.metric_rate.as_deref().is_some_and(|m| !m.is_empty())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `m:splitBy():splitBy()` → `m:splitBy()`.
fn collapse_split_by(metric: &str) -> &str {
    match metric.strip_suffix(SPLIT_BY) {
        Some(head) if head.ends_with(SPLIT_BY) => head,
        _ => metric,
    }
}

fn missing(field: &str) -> CodecError {
    CodecError::validation("slo", field, format!("{field} is required"))
}

#[derive(Default)]
struct Partial {
    name: Option<String>,
    enabled: Option<bool>,
    description: Option<String>,
    metric_rate: Option<String>,
    metric_expression: Option<String>,
    metric_numerator: Option<String>,
    metric_denominator: Option<String>,
    evaluation_type: Option<String>,
    filter: Option<String>,
    target: Option<f64>,
    warning: Option<f64>,
    timeframe: Option<String>,
}

impl Partial {
    fn from_fields(fields: &RawMap) -> Result<Self> {
        Ok(Self {
            name: json::string_field(fields, "name")?,
            enabled: json::field::<Option<bool>>(fields, "enabled", "bool")?.flatten(),
            description: json::string_field(fields, "description")?,
            metric_rate: non_empty(json::string_field(fields, "metricRate")?),
            metric_expression: non_empty(json::string_field(fields, "metricExpression")?),
            metric_numerator: non_empty(json::string_field(fields, "metricNumerator")?),
            metric_denominator: non_empty(json::string_field(fields, "metricDenominator")?),
            evaluation_type: json::string_field(fields, "evaluationType")?,
            filter: json::string_field(fields, "filter")?,
            target: json::field::<Option<f64>>(fields, "target", "float")?.flatten(),
            warning: json::field::<Option<f64>>(fields, "warning", "float")?.flatten(),
            timeframe: json::string_field(fields, "timeframe")?,
        })
    }

    /// `enabled` defaults to false on the wire, where the API omits it
    /// for disabled SLOs.
    fn finish(self, default_enabled: bool, unknowns: Unknowns) -> Result<Slo> {
        Ok(Slo {
            name: self.name.ok_or_else(|| missing("name"))?,
            enabled: self.enabled.unwrap_or(default_enabled),
            description: self.description,
            metric_rate: self.metric_rate,
            metric_expression: self.metric_expression,
            metric_numerator: self.metric_numerator,
            metric_denominator: self.metric_denominator,
            evaluation_type: self.evaluation_type.ok_or_else(|| missing("evaluationType"))?,
            filter: self.filter,
            target: self.target.ok_or_else(|| missing("target"))?,
            warning: self.warning.ok_or_else(|| missing("warning"))?,
            timeframe: self.timeframe.ok_or_else(|| missing("timeframe"))?,
            unknowns,
        })
    }
}

impl JsonCodec for Slo {
    fn from_json_map(raw: RawMap) -> Result<Self> {
        let (fields, residual) = unknowns::split(raw, KNOWN_FIELDS);
        Partial::from_fields(&fields)?.finish(false, residual)
    }

    fn to_json_map(&self) -> Result<RawMap> {
        let mut fields = RawMap::new();
        json::put(&mut fields, "name", &self.name)?;
        if self.enabled {
            json::put(&mut fields, "enabled", &true)?;
        }
        if let Some(description) = &self.description {
            json::put(&mut fields, "description", description)?;
        }
        json::put(&mut fields, "useRateMetric", &self.use_rate_metric())?;
        // The API expects these three keys even when unused.
        json::put(&mut fields, "metricRate", self.metric_rate.as_deref().unwrap_or(""))?;
        json::put(&mut fields, "metricNumerator", self.metric_numerator.as_deref().unwrap_or(""))?;
        json::put(
            &mut fields,
            "metricDenominator",
            self.metric_denominator.as_deref().unwrap_or(""),
        )?;
        if let Some(expression) = &self.metric_expression {
            json::put(&mut fields, "metricExpression", expression)?;
        }
        json::put(&mut fields, "evaluationType", &self.evaluation_type)?;
        if let Some(filter) = &self.filter {
            json::put(&mut fields, "filter", filter)?;
        }
        json::put(&mut fields, "target", &self.target)?;
        json::put(&mut fields, "warning", &self.warning)?;
        json::put(&mut fields, "timeframe", &self.timeframe)?;
        Ok(unknowns::merge(fields, &self.unknowns))
    }
}

impl Resource for Slo {
    fn schema() -> Schema {
        let mut schema = Schema::new();
        schema.insert("name", FieldSchema::string("The name of the SLO").required());
        schema.insert(
            "description",
            FieldSchema::string("The custom description of the SLO (optional)"),
        );
        schema.insert(
            "metric_expression",
            FieldSchema::string("The percentage-based metric expression for the calculation of the SLO"),
        );
        schema.insert(
            "disabled",
            FieldSchema::bool("The SLO is enabled (`false`) or disabled (`true`)"),
        );
        schema.insert(
            "rate",
            FieldSchema::string("The percentage-based metric for the calculation of the SLO")
                .conflicts_with(&["numerator", "denominator"]),
        );
        schema.insert(
            "numerator",
            FieldSchema::string("The metric for the count of successes (the numerator in rate calculation)")
                .conflicts_with(&["rate"])
                .required_with(&["denominator"])
                .deprecated("`numerator` and `denominator` have been replaced by `metric_expression`"),
        );
        schema.insert(
            "denominator",
            FieldSchema::string("The total count metric (the denominator in rate calculation)")
                .conflicts_with(&["rate"])
                .required_with(&["numerator"]),
        );
        schema.insert(
            "evaluation",
            FieldSchema::string("The evaluation type of the SLO. Currently only `AGGREGATE` is supported")
                .required(),
        );
        schema.insert(
            "filter",
            FieldSchema::string("The entity filter for the SLO evaluation. Use the syntax of entity selector"),
        );
        schema.insert("target", FieldSchema::float("The target value of the SLO").required());
        schema.insert(
            "warning",
            FieldSchema::float(
                "The warning value of the SLO. At warning state the SLO is still fulfilled but is getting close to failure",
            )
            .required(),
        );
        schema.insert(
            "timeframe",
            FieldSchema::string("The timeframe for the SLO evaluation. Use the syntax of the global timeframe selector")
                .required(),
        );
        schema.insert(UNKNOWNS_KEY, FieldSchema::unknowns());
        schema
    }

    fn to_properties(&self) -> Result<Properties> {
        let metric = |m: &Option<String>| {
            m.as_deref()
                .filter(|m| !m.is_empty())
                .map(|m| collapse_split_by(m).to_string())
        };

        let mut props = Properties::new();
        props.insert_opt(UNKNOWNS_KEY, self.unknowns.to_blob()?);
        props.insert("name", self.name.as_str());
        props.insert_opt("description", self.description.clone());
        if !self.enabled {
            props.insert("disabled", true);
        }
        props.insert_opt("rate", metric(&self.metric_rate));
        props.insert_opt("metric_expression", non_empty(self.metric_expression.clone()));
        props.insert_opt("numerator", metric(&self.metric_numerator));
        props.insert_opt("denominator", metric(&self.metric_denominator));
        props.insert("evaluation", self.evaluation_type.as_str());
        props.insert_opt("filter", self.filter.clone());
        props.insert("target", self.target);
        props.insert("warning", self.warning);
        props.insert("timeframe", self.timeframe.as_str());
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

        let strings: [(&str, &mut Option<String>); 8] = [
            ("name", &mut partial.name),
            ("description", &mut partial.description),
            ("rate", &mut partial.metric_rate),
            ("metric_expression", &mut partial.metric_expression),
            ("numerator", &mut partial.metric_numerator),
            ("denominator", &mut partial.metric_denominator),
            ("evaluation", &mut partial.evaluation_type),
            ("filter", &mut partial.filter),
        ];
        for (key, slot) in strings {
            if let Some(value) = decoder.get_string(key)? {
                *slot = Some(value);
            }
        }
        if let Some(timeframe) = decoder.get_string("timeframe")? {
            partial.timeframe = Some(timeframe);
        }
        if let Some(disabled) = decoder.get_bool("disabled")? {
            partial.enabled = Some(!disabled);
        }
        if let Some(target) = decoder.get_float("target")? {
            partial.target = Some(target);
        }
        if let Some(warning) = decoder.get_float("warning")? {
            partial.warning = Some(warning);
        }

        partial.metric_rate = non_empty(partial.metric_rate);
        partial.metric_expression = non_empty(partial.metric_expression);
        partial.metric_numerator = non_empty(partial.metric_numerator);
        partial.metric_denominator = non_empty(partial.metric_denominator);
        partial.finish(true, residual)
    }
}
