//! Stateless schema/semantic checks for inbound transactions.
//!
//! Check order is fixed: missing `agent_id`, missing `value_ghs`, agent
//! format, then value. Validation never logs; callers decide what to do with
//! the returned error.

use serde_json::Value;

use crate::error::ValidationError;
use crate::record::{RawTransaction, TransactionRecord, ValidRecord};

/// Upper bound on agent identifier length.
pub const MAX_AGENT_ID_LEN: usize = 64;

#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionValidator;

impl TransactionValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a wire record and lift it into a typed one.
    pub fn validate(&self, raw: RawTransaction) -> Result<ValidRecord, ValidationError> {
        let RawTransaction {
            agent_id,
            value_ghs,
            metadata,
        } = raw;

        let agent_id = agent_id.ok_or(ValidationError::MissingField("agent_id"))?;
        let value_ghs = value_ghs.ok_or(ValidationError::MissingField("value_ghs"))?;

        let agent_id = match agent_id {
            Value::String(s) => s,
            other => {
                return Err(ValidationError::InvalidAgentId(format!(
                    "expected string, got {}",
                    json_kind(&other)
                )))
            }
        };
        let value_ghs = parse_amount(&value_ghs)?;

        self.check(TransactionRecord::with_metadata(agent_id, value_ghs, metadata))
    }

    /// Validate an already-typed record. Success returns it unchanged.
    pub fn check(&self, record: TransactionRecord) -> Result<ValidRecord, ValidationError> {
        check_agent_id(record.agent_id())?;
        check_value(record.value_ghs())?;
        Ok(ValidRecord::new(record))
    }
}

fn check_agent_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::InvalidAgentId("must not be empty".into()));
    }
    if id.len() > MAX_AGENT_ID_LEN {
        return Err(ValidationError::InvalidAgentId(format!(
            "longer than {MAX_AGENT_ID_LEN} bytes"
        )));
    }
    if !id.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(ValidationError::InvalidAgentId(
            "must be a printable token without whitespace".into(),
        ));
    }
    Ok(())
}

fn check_value(v: f64) -> Result<(), ValidationError> {
    if !v.is_finite() {
        return Err(ValidationError::InvalidValue("must be finite".into()));
    }
    if v < 0.0 {
        return Err(ValidationError::InvalidValue(format!("must be non-negative, got {v}")));
    }
    Ok(())
}

/// Accepts a JSON number or decimal text ("250.75").
fn parse_amount(v: &Value) -> Result<f64, ValidationError> {
    match v {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ValidationError::InvalidValue(format!("unrepresentable number {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidValue(format!("not a decimal: {s:?}"))),
        other => Err(ValidationError::InvalidValue(format!(
            "expected number, got {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
