use thiserror::Error;

use crate::domain::ParamField;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operation \"{0}\"")]
pub struct UnknownOperation(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown interpolation \"{0}\"")]
pub struct UnknownInterpolation(pub String);

/// A parameter field whose text cannot be sent for the selected operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("{field} must be {expected}, got \"{value}\"")]
    Malformed {
        field: ParamField,
        value: String,
        expected: &'static str,
    },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: ParamField,
        value: String,
        min: String,
        max: String,
    },
}

impl ParamError {
    pub fn field(&self) -> ParamField {
        match self {
            ParamError::Malformed { field, .. } | ParamError::OutOfRange { field, .. } => *field,
        }
    }
}

/// The response body parsed but does not follow the process endpoint contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("successful response is missing `{0}`")]
    MissingField(&'static str),
}
