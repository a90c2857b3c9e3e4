use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    /// Discriminator not present in the variant registry.
    #[error("unknown comparison variant: '{0}'")]
    UnknownVariant(String),

    /// The `unknowns` escape-hatch blob is not a JSON object.
    #[error("malformed unknown field data: {0}")]
    MalformedUnknownFieldData(#[source] serde_json::Error),

    #[error("type mismatch for field '{field}': expected {expected}")]
    TypeMismatch { field: String, expected: &'static str },

    /// Variant-specific operator/value domain violation.
    #[error("validation error in {variant}.{field}: {message}")]
    Validation {
        variant: String,
        field: String,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    pub fn type_mismatch(field: impl Into<String>, expected: &'static str) -> Self {
        CodecError::TypeMismatch {
            field: field.into(),
            expected,
        }
    }

    pub fn validation(
        variant: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CodecError::Validation {
            variant: variant.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
