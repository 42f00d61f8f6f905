//! Validated input for a positions query.

use rmcp::model::JsonObject;
use serde_json::Value;

use super::error::PositionsError;

/// A positions lookup that passed validation.
///
/// `symbol` is upper-case and non-empty. `user_id` is `Some` only when the
/// caller supplied a non-empty value, which is forwarded unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionRequest {
    symbol: String,
    user_id: Option<String>,
}

impl PositionRequest {
    /// Build a request from untyped tool arguments.
    pub fn parse(arguments: &JsonObject) -> Result<Self, PositionsError> {
        let symbol = match arguments.get("symbol") {
            None | Some(Value::Null) => return Err(PositionsError::MissingSymbol),
            Some(Value::String(s)) => s.trim().to_uppercase(),
            Some(other) => {
                return Err(PositionsError::invalid_arguments(format!(
                    "'symbol' must be a string, got {}",
                    json_type_name(other)
                )));
            }
        };

        if symbol.is_empty() {
            return Err(PositionsError::MissingSymbol);
        }

        let user_id = match arguments.get("user_id") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(PositionsError::invalid_arguments(format!(
                    "'user_id' must be a string, got {}",
                    json_type_name(other)
                )));
            }
        };

        Ok(Self { symbol, user_id })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Query string pairs for the backend request.
    pub fn query_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = vec![("symbol", self.symbol.as_str())];
        if let Some(user_id) = &self.user_id {
            params.push(("user_id", user_id.as_str()));
        }
        params
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
