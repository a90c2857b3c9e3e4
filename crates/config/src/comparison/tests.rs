//! Tests for the comparison codec and registry.

use monconf_core::schema::{TreeDecoder, Value};

use super::*;

fn sample_comparisons() -> Vec<Comparison> {
    vec![
        CustomApplicationType::wrap(TypedComparison::new(
            false,
            custom_application_type::Operator::Equals,
            Some(custom_application_type::Value::MicrosoftHololens),
        )),
        SyntheticEngineType::wrap(TypedComparison::new(
            true,
            synthetic_engine_type::Operator::Equals,
            Some(synthetic_engine_type::Value::Classic),
        )),
        IndexedName::wrap(TypedComparison::new(
            false,
            indexed_name::Operator::Contains,
            Some("checkout".to_string()),
        )),
        IndexedString::wrap(TypedComparison::new(true, indexed_string::Operator::Exists, None)),
        PaasType::wrap(TypedComparison::new(
            false,
            paas_type::Operator::Equals,
            Some(paas_type::Value::Kubernetes),
        )),
        AzureComputeMode::wrap(TypedComparison::new(
            false,
            azure_compute_mode::Operator::Equals,
            Some(azure_compute_mode::Value::Shared),
        )),
        ServiceType::wrap(TypedComparison::new(
            false,
            service_type::Operator::Equals,
            Some(service_type::Value::WebRequestService),
        )),
    ]
}

fn decode_props(comparison_type: ComparisonType, props: &Properties) -> Result<Comparison> {
    comparison_type.codec().decode_schema(&TreeDecoder::new(props))
}

#[test]
fn json_round_trip_for_every_variant() {
    for comparison in sample_comparisons() {
        let json = comparison.to_json().unwrap();
        let back = Comparison::from_json(json.as_bytes()).unwrap();
        assert_eq!(back, comparison, "round trip of {json}");
    }
}

#[test]
fn schema_round_trip_for_every_variant() {
    for comparison in sample_comparisons() {
        let props = comparison.to_properties().unwrap();
        let back = decode_props(comparison.comparison_type(), &props).unwrap();
        assert_eq!(back, comparison);
    }
}

#[test]
fn decode_json_reads_known_fields() {
    let json = br#"{"type": "SERVICE_TYPE", "negate": true, "operator": "EQUALS", "value": "DATABASE_SERVICE"}"#;
    let comparison = Comparison::from_json(json).unwrap();
    assert_eq!(comparison.comparison_type(), ComparisonType::ServiceType);
    assert!(comparison.negate());
    assert_eq!(comparison.operator(), "EQUALS");
    assert_eq!(comparison.value(), Some("DATABASE_SERVICE"));
    assert!(comparison.unknowns().is_empty());
}

#[test]
fn unknown_field_survives_json_path() {
    let json = br#"{"type":"INDEXED_NAME","negate":false,"operator":"EQUALS","value":"web","futureField":"x"}"#;
    let comparison = Comparison::from_json(json).unwrap();
    assert_eq!(comparison.unknowns().len(), 1);
    assert_eq!(
        comparison.to_json().unwrap(),
        r#"{"futureField":"x","negate":false,"operator":"EQUALS","type":"INDEXED_NAME","value":"web"}"#
    );
}

#[test]
fn unknown_field_survives_schema_path() {
    let json = br#"{"type":"INDEXED_NAME","operator":"EQUALS","value":"web","futureField":"x"}"#;
    let comparison = Comparison::from_json(json).unwrap();

    let props = comparison.to_properties().unwrap();
    assert_eq!(
        props.get(UNKNOWNS_KEY),
        Some(&Value::from(r#"{"futureField":"x"}"#))
    );

    let back = decode_props(ComparisonType::IndexedName, &props).unwrap();
    assert_eq!(back, comparison);
    assert!(back.to_json().unwrap().contains(r#""futureField":"x""#));
}

#[test]
fn explicit_schema_fields_override_unknowns_blob() {
    let mut props = Properties::new();
    props.insert(
        UNKNOWNS_KEY,
        r#"{"operator":"EQUALS","value":"web","negate":true,"futureField":1}"#,
    );
    props.insert("operator", "EXISTS");

    let comparison = decode_props(ComparisonType::IndexedName, &props).unwrap();
    assert_eq!(comparison.operator(), "EXISTS");
    // seeded from the blob, not overridden
    assert!(comparison.negate());
    // dropped by the existence operator
    assert_eq!(comparison.value(), None);
    assert_eq!(comparison.unknowns().len(), 1);
    assert!(comparison.unknowns().get("futureField").is_some());
    assert!(comparison.unknowns().get("operator").is_none());
}

#[test]
fn explicit_negate_overrides_blob() {
    let mut props = Properties::new();
    props.insert(UNKNOWNS_KEY, r#"{"negate":true}"#);
    props.insert("negate", false);
    props.insert("operator", "EQUALS");
    props.insert("value", "DESKTOP");

    let comparison = decode_props(ComparisonType::CustomApplicationType, &props).unwrap();
    assert!(!comparison.negate());
    assert!(comparison.unknowns().is_empty());
}

#[test]
fn absent_fields_keep_zero_values() {
    let mut props = Properties::new();
    props.insert("operator", "EQUALS");
    let comparison = decode_props(ComparisonType::IndexedString, &props).unwrap();
    assert!(!comparison.negate());
    assert_eq!(comparison.value(), None);
    assert!(comparison.unknowns().is_empty());
}

#[test]
fn discriminator_is_always_the_variant_constant() {
    let mut typed = TypedComparison::<IndexedName>::new(
        false,
        indexed_name::Operator::Equals,
        Some("web".to_string()),
    );
    typed
        .unknowns_mut()
        .insert("type", serde_json::value::to_raw_value("SERVICE_TYPE").unwrap());

    let json = typed.to_json().unwrap();
    assert!(json.contains(r#""type":"INDEXED_NAME""#));
    assert!(!json.contains("SERVICE_TYPE"));
}

#[test]
fn forged_discriminator_is_rejected() {
    let json = br#"{"type":"SERVICE_TYPE","operator":"EQUALS","value":"web"}"#;
    let err = TypedComparison::<IndexedName>::from_json(json).unwrap_err();
    assert!(matches!(
        err,
        CodecError::Validation { ref field, .. } if field == "type"
    ));

    let mut props = Properties::new();
    props.insert("type", "PAAS_TYPE");
    props.insert("operator", "EQUALS");
    assert!(decode_props(ComparisonType::IndexedName, &props).is_err());
}

#[test]
fn existence_operator_omits_value() {
    let typed = TypedComparison::<ServiceType>::new(
        false,
        service_type::Operator::Exists,
        Some(service_type::Value::External),
    );
    assert_eq!(typed.value(), None);
    let json = typed.to_json().unwrap();
    assert!(!json.contains("\"value\""));
    assert!(!typed.to_properties().unwrap().contains_key("value"));

    let decoded =
        Comparison::from_json(br#"{"type":"PAAS_TYPE","operator":"EXISTS","value":"HEROKU"}"#)
            .unwrap();
    assert_eq!(decoded.value(), None);
}

#[test]
fn unknown_variant_is_rejected() {
    let err = Comparison::from_json(br#"{"type":"HOST_TECH","operator":"EQUALS"}"#).unwrap_err();
    assert!(matches!(err, CodecError::UnknownVariant(ref tag) if tag == "HOST_TECH"));

    let err = resolve("HOST_TECH").unwrap_err();
    assert!(matches!(err, CodecError::UnknownVariant(_)));
}

#[test]
fn missing_discriminator_is_a_validation_error() {
    let err = Comparison::from_json(br#"{"operator":"EQUALS"}"#).unwrap_err();
    assert!(matches!(err, CodecError::Validation { .. }));
}

#[test]
fn malformed_unknowns_blob_is_fatal() {
    let mut props = Properties::new();
    props.insert(UNKNOWNS_KEY, "{not json");
    props.insert("operator", "EQUALS");
    let err = decode_props(ComparisonType::IndexedName, &props).unwrap_err();
    assert!(matches!(err, CodecError::MalformedUnknownFieldData(_)));
}

#[test]
fn non_bool_negate_is_a_type_mismatch() {
    let err = Comparison::from_json(br#"{"type":"INDEXED_NAME","negate":"yes","operator":"EQUALS"}"#)
        .unwrap_err();
    assert!(matches!(err, CodecError::TypeMismatch { ref field, .. } if field == "negate"));

    let mut props = Properties::new();
    props.insert("negate", "yes");
    props.insert("operator", "EQUALS");
    let err = decode_props(ComparisonType::IndexedName, &props).unwrap_err();
    assert!(matches!(err, CodecError::TypeMismatch { .. }));
}

#[test]
fn null_negate_is_false() {
    let comparison =
        Comparison::from_json(br#"{"type":"INDEXED_NAME","negate":null,"operator":"EXISTS"}"#)
            .unwrap();
    assert!(!comparison.negate());
}

#[test]
fn operator_outside_variant_domain_is_rejected() {
    let err = Comparison::from_json(br#"{"type":"INDEXED_STRING","operator":"CONTAINS","value":"x"}"#)
        .unwrap_err();
    match err {
        CodecError::Validation {
            variant,
            field,
            message,
        } => {
            assert_eq!(variant, "INDEXED_STRING");
            assert_eq!(field, "operator");
            assert!(message.contains("EQUALS, EXISTS"));
        }
        other => panic!("expected Validation, got: {other:?}"),
    }
}

#[test]
fn value_outside_variant_domain_is_rejected() {
    let err = Comparison::from_json(br#"{"type":"AZURE_COMPUTE_MODE","operator":"EQUALS","value":"SPOT"}"#)
        .unwrap_err();
    assert!(matches!(
        err,
        CodecError::Validation { ref field, .. } if field == "value"
    ));
}

#[test]
fn missing_operator_is_rejected() {
    let err = Comparison::from_json(br#"{"type":"INDEXED_NAME","value":"x"}"#).unwrap_err();
    assert!(matches!(
        err,
        CodecError::Validation { ref field, .. } if field == "operator"
    ));
}

#[test]
fn registry_covers_every_discriminator() {
    assert_eq!(variants().len(), ComparisonType::ALL.len());
    for tag in ComparisonType::ALL {
        let codec = resolve(tag).unwrap();
        assert_eq!(codec.comparison_type.as_str(), *tag);
        assert_eq!(codec.comparison_type.codec().block_name, codec.block_name);
        assert_eq!(resolve_block(codec.block_name).unwrap().comparison_type, codec.comparison_type);
        assert!(codec.operators.contains(&EXISTS));
    }
    assert!(resolve_block("host_tech").is_none());
}

#[test]
fn registry_declares_value_domains() {
    let indexed = ComparisonType::IndexedName.codec();
    assert!(indexed.is_free_text());
    assert_eq!(indexed.operators, &["EQUALS", "CONTAINS", "EXISTS"]);

    let paas = resolve("PAAS_TYPE").unwrap();
    assert!(!paas.is_free_text());
    assert!(paas.values.contains(&"OPENSHIFT"));
    assert_eq!(ComparisonType::PaasType.block_name(), "paas_type");
}

#[test]
fn variant_schema_marks_operator_required() {
    let schema = ComparisonType::ServiceType.codec().schema();
    assert!(schema["operator"].required);
    assert!(schema["type"].deprecated.is_some());
    assert!(schema.contains_key(UNKNOWNS_KEY));
    assert!(schema["value"].description.contains("WEB_SERVICE"));
}

#[test]
fn encoded_tree_validates_against_variant_schema() {
    for comparison in sample_comparisons() {
        let props = comparison.to_properties().unwrap();
        monconf_core::schema::validate(&comparison.codec().schema(), &props).unwrap();
    }
}
