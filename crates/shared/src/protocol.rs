use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{domain::Operation, error::ProtocolError, params::OperationParams};

pub const PROCESS_PATH: &str = "/api/process";
pub const IMAGE_FIELD: &str = "image";
pub const OPERATION_FIELD: &str = "operation";

/// Text parts of a process submission: the operation followed by all eight
/// parameter fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessForm {
    pub operation: Operation,
    pub fields: Vec<(&'static str, String)>,
}

impl ProcessForm {
    pub fn from_params(params: &OperationParams) -> Self {
        Self {
            operation: params.operation(),
            fields: params.to_fields(),
        }
    }

    /// Every text part in wire order, `operation` first.
    pub fn text_parts(&self) -> Vec<(&'static str, String)> {
        let mut parts = Vec::with_capacity(self.fields.len() + 1);
        parts.push((OPERATION_FIELD, self.operation.as_str().to_string()));
        parts.extend(self.fields.iter().cloned());
        parts
    }
}

/// Body returned by the process endpoint, for success and failure alike.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessResponse {
    /// Missing, `null`, `0` and `""` all count as failure.
    #[serde(default, deserialize_with = "truthy")]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub input_url: Option<String>,
    #[serde(default)]
    pub output_url: Option<String>,
    #[serde(default)]
    pub meta: Option<Value>,
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    Processed {
        input_url: String,
        output_url: String,
        meta: Value,
    },
    Rejected {
        error: Option<String>,
    },
}

impl ProcessResponse {
    pub fn into_outcome(self) -> Result<ProcessOutcome, ProtocolError> {
        if !self.ok {
            let error = self.error.filter(|message| !message.is_empty());
            return Ok(ProcessOutcome::Rejected { error });
        }

        Ok(ProcessOutcome::Processed {
            input_url: self
                .input_url
                .ok_or(ProtocolError::MissingField("input_url"))?,
            output_url: self
                .output_url
                .ok_or(ProtocolError::MissingField("output_url"))?,
            meta: self.meta.unwrap_or(Value::Null),
        })
    }
}
