use crate::error::CommandError;
use jsonschema::Validator;
use serde_json::{json, Value};

/// Structured-output contract for a command: the JSON Schema handed to the
/// CLI, and validation of whatever comes back.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    schema: Value,
}

impl OutputSchema {
    pub fn new(schema: Value) -> Self {
        Self { schema }
    }

    /// An object schema whose listed properties are all required strings.
    pub fn strings(fields: &[&str]) -> Self {
        let properties: serde_json::Map<String, Value> = fields
            .iter()
            .map(|field| (field.to_string(), json!({"type": "string"})))
            .collect();

        Self::new(json!({
            "type": "object",
            "properties": properties,
            "required": fields,
            "additionalProperties": false
        }))
    }

    pub fn json_schema(&self) -> &Value {
        &self.schema
    }

    /// Decode `text` as JSON and check it against the schema.
    pub fn validate(&self, text: &str) -> Result<Value, CommandError> {
        let value: Value = serde_json::from_str(text.trim()).map_err(|e| {
            CommandError::SchemaValidation(format!("response is not valid JSON: {}", e))
        })?;

        let validator = Validator::new(&self.schema)
            .map_err(|e| CommandError::SchemaValidation(format!("invalid schema: {}", e)))?;

        validator
            .validate(&value)
            .map_err(|e| CommandError::SchemaValidation(e.to_string()))?;

        Ok(value)
    }
}

/// Required string field of a validated object.
pub fn string_field<'a>(value: &'a Value, field: &str) -> Result<&'a str, CommandError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| CommandError::Render(format!("missing string field '{}'", field)))
}
