//! Cloud provider error types

use thiserror::Error;

/// Cloud provider errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("{label}: neither '{static_key}' nor '{dynamic_key}' is set")]
    MissingField {
        label: String,
        static_key: &'static str,
        dynamic_key: &'static str,
    },

    #[error("Criteria for {field} returned multiple values: {criteria}")]
    AmbiguousCriteria { field: &'static str, criteria: String },

    #[error("Criteria for {field} did not return any value: {criteria}")]
    NoMatch { field: &'static str, criteria: String },

    #[error("Malformed criteria '{input}' at offset {offset}: {reason}")]
    MalformedCriteria {
        input: String,
        offset: usize,
        reason: String,
    },

    #[error("Record matched by {field} has no '{attribute}' attribute")]
    MissingAttribute {
        field: &'static str,
        attribute: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unexpected API response: {0}")]
    UnexpectedResponse(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
