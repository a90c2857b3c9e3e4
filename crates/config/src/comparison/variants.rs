//! Concrete comparison variants.
//!
//! Each variant is a zero-sized marker implementing [`Shape`]; its operator
//! and value enums live in a module named after the variant.

use super::{Comparison, ComparisonOperator, ComparisonType, Shape, TypedComparison};

pub mod custom_application_type {
    string_enum! {
        pub enum Operator {
            Equals => "EQUALS",
            Exists => "EXISTS",
        }
    }

    string_enum! {
        pub enum Value {
            AmazonEcho => "AMAZON_ECHO",
            Desktop => "DESKTOP",
            Embedded => "EMBEDDED",
            Iot => "IOT",
            MicrosoftHololens => "MICROSOFT_HOLOLENS",
            Ufo => "UFO",
        }
    }
}

pub mod synthetic_engine_type {
    string_enum! {
        pub enum Operator {
            Equals => "EQUALS",
            Exists => "EXISTS",
        }
    }

    string_enum! {
        pub enum Value {
            Classic => "CLASSIC",
            Custom => "CUSTOM",
        }
    }
}

pub mod indexed_name {
    string_enum! {
        pub enum Operator {
            Equals => "EQUALS",
            Contains => "CONTAINS",
            Exists => "EXISTS",
        }
    }
}

pub mod indexed_string {
    string_enum! {
        pub enum Operator {
            Equals => "EQUALS",
            Exists => "EXISTS",
        }
    }
}

pub mod paas_type {
    string_enum! {
        pub enum Operator {
            Equals => "EQUALS",
            Exists => "EXISTS",
        }
    }

    string_enum! {
        pub enum Value {
            AwsEcsEc2 => "AWS_ECS_EC2",
            AwsEcsFargate => "AWS_ECS_FARGATE",
            AwsLambda => "AWS_LAMBDA",
            AzureFunctions => "AZURE_FUNCTIONS",
            AzureWebsites => "AZURE_WEBSITES",
            CloudFoundry => "CLOUD_FOUNDRY",
            GoogleAppEngine => "GOOGLE_APP_ENGINE",
            Heroku => "HEROKU",
            Kubernetes => "KUBERNETES",
            Openshift => "OPENSHIFT",
        }
    }
}

pub mod azure_compute_mode {
    string_enum! {
        pub enum Operator {
            Equals => "EQUALS",
            Exists => "EXISTS",
        }
    }

    string_enum! {
        pub enum Value {
            Dedicated => "DEDICATED",
            Shared => "SHARED",
        }
    }
}

pub mod service_type {
    string_enum! {
        pub enum Operator {
            Equals => "EQUALS",
            Exists => "EXISTS",
        }
    }

    string_enum! {
        pub enum Value {
            BackgroundActivity => "BACKGROUND_ACTIVITY",
            CicsService => "CICS_SERVICE",
            CustomService => "CUSTOM_SERVICE",
            DatabaseService => "DATABASE_SERVICE",
            EnterpriseServiceBusService => "ENTERPRISE_SERVICE_BUS_SERVICE",
            External => "EXTERNAL",
            IbmIntegrationBusService => "IBM_INTEGRATION_BUS_SERVICE",
            ImsService => "IMS_SERVICE",
            MessagingService => "MESSAGING_SERVICE",
            QueueListenerService => "QUEUE_LISTENER_SERVICE",
            RmiService => "RMI_SERVICE",
            RpcService => "RPC_SERVICE",
            WebRequestService => "WEB_REQUEST_SERVICE",
            WebService => "WEB_SERVICE",
        }
    }
}

impl ComparisonOperator for custom_application_type::Operator {}
impl ComparisonOperator for synthetic_engine_type::Operator {}
impl ComparisonOperator for indexed_name::Operator {}
impl ComparisonOperator for indexed_string::Operator {}
impl ComparisonOperator for paas_type::Operator {}
impl ComparisonOperator for azure_compute_mode::Operator {}
impl ComparisonOperator for service_type::Operator {}

/// Type of a custom application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomApplicationType;

impl Shape for CustomApplicationType {
    const TYPE: ComparisonType = ComparisonType::CustomApplicationType;
    const OPERATOR_DOC: &'static str =
        "Operator of the comparison. Possible values are EQUALS and EXISTS. You can reverse it by setting **negate** to `true`";
    const VALUE_DOC: &'static str =
        "The value to compare to. Possible values are AMAZON_ECHO, DESKTOP, EMBEDDED, IOT, MICROSOFT_HOLOLENS and UFO.";

    type Operator = custom_application_type::Operator;
    type Value = custom_application_type::Value;

    fn wrap(comparison: TypedComparison<Self>) -> Comparison {
        Comparison::CustomApplicationType(comparison)
    }
}

/// Engine of a synthetic monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticEngineType;

impl Shape for SyntheticEngineType {
    const TYPE: ComparisonType = ComparisonType::SyntheticEngineType;
    const OPERATOR_DOC: &'static str =
        "Operator of the comparison. Possible values are EQUALS and EXISTS. You can reverse it by setting **negate** to `true`";
    const VALUE_DOC: &'static str = "The value to compare to. Possible values are CLASSIC and CUSTOM";

    type Operator = synthetic_engine_type::Operator;
    type Value = synthetic_engine_type::Value;

    fn wrap(comparison: TypedComparison<Self>) -> Comparison {
        Comparison::SyntheticEngineType(comparison)
    }
}

/// Indexed name attribute, such as a host or service name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedName;

impl Shape for IndexedName {
    const TYPE: ComparisonType = ComparisonType::IndexedName;
    const OPERATOR_DOC: &'static str =
        "Operator of the comparison. Possible values are CONTAINS, EQUALS and EXISTS. You can reverse it by setting **negate** to `true`";
    const VALUE_DOC: &'static str = "The value to compare to";

    type Operator = indexed_name::Operator;
    type Value = String;

    fn wrap(comparison: TypedComparison<Self>) -> Comparison {
        Comparison::IndexedName(comparison)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedString;

impl Shape for IndexedString {
    const TYPE: ComparisonType = ComparisonType::IndexedString;
    const OPERATOR_DOC: &'static str =
        "Operator of the comparison. Possible values are EQUALS and EXISTS. You can reverse it by setting **negate** to `true`";
    const VALUE_DOC: &'static str = "The value to compare to";

    type Operator = indexed_string::Operator;
    type Value = String;

    fn wrap(comparison: TypedComparison<Self>) -> Comparison {
        Comparison::IndexedString(comparison)
    }
}

/// Platform-as-a-service a process runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaasType;

impl Shape for PaasType {
    const TYPE: ComparisonType = ComparisonType::PaasType;
    const OPERATOR_DOC: &'static str =
        "Operator of the comparison. Possible values are EQUALS and EXISTS. You can reverse it by setting **negate** to `true`";
    const VALUE_DOC: &'static str =
        "The value to compare to. Possible values are AWS_ECS_EC2, AWS_ECS_FARGATE, AWS_LAMBDA, AZURE_FUNCTIONS, AZURE_WEBSITES, CLOUD_FOUNDRY, GOOGLE_APP_ENGINE, HEROKU, KUBERNETES and OPENSHIFT.";

    type Operator = paas_type::Operator;
    type Value = paas_type::Value;

    fn wrap(comparison: TypedComparison<Self>) -> Comparison {
        Comparison::PaasType(comparison)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AzureComputeMode;

impl Shape for AzureComputeMode {
    const TYPE: ComparisonType = ComparisonType::AzureComputeMode;
    const OPERATOR_DOC: &'static str =
        "Operator of the comparison. Possible values are EQUALS and EXISTS. You can reverse it by setting **negate** to `true`";
    const VALUE_DOC: &'static str = "The value to compare to. Possible values are DEDICATED or SHARED.";

    type Operator = azure_compute_mode::Operator;
    type Value = azure_compute_mode::Value;

    fn wrap(comparison: TypedComparison<Self>) -> Comparison {
        Comparison::AzureComputeMode(comparison)
    }
}

/// Kind of a detected service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceType;

impl Shape for ServiceType {
    const TYPE: ComparisonType = ComparisonType::ServiceType;
    const OPERATOR_DOC: &'static str =
        "Operator of the comparison. Possible values are EQUALS and EXISTS. You can reverse it by setting **negate** to `true`";
    const VALUE_DOC: &'static str =
        "The value to compare to. Possible values are BACKGROUND_ACTIVITY, CICS_SERVICE, CUSTOM_SERVICE, DATABASE_SERVICE, ENTERPRISE_SERVICE_BUS_SERVICE, EXTERNAL, IBM_INTEGRATION_BUS_SERVICE, IMS_SERVICE, MESSAGING_SERVICE, QUEUE_LISTENER_SERVICE, RMI_SERVICE, RPC_SERVICE, WEB_REQUEST_SERVICE and WEB_SERVICE.";

    type Operator = service_type::Operator;
    type Value = service_type::Value;

    fn wrap(comparison: TypedComparison<Self>) -> Comparison {
        Comparison::ServiceType(comparison)
    }
}
