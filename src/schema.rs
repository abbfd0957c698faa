// 📐 Shape Layer - Schema Validation
// Turns an untyped JSON payload into a typed record, or explains why it can't

use crate::attributes::{FieldDefinition, FieldType, Schema, ValidationRule};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A single violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldIssue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Rejection of a whole payload, carrying every issue found
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {context}: {}", summarize(.issues))]
pub struct ValidationError {
    pub context: String,
    pub issues: Vec<FieldIssue>,
}

/// Issues found for payloads that are not JSON objects are reported on this field
pub const ROOT_FIELD: &str = "$";

impl ValidationError {
    pub fn single(
        context: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationError {
            context: context.into(),
            issues: vec![FieldIssue::new(field, message)],
        }
    }

    /// Names of the rejected fields, in schema order
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }

    pub fn has_issue_for(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Check a payload against a schema.
///
/// Returns an object holding exactly the schema's fields; anything else in the
/// payload is dropped. Every field is checked so the caller sees all issues at once.
pub fn validate(schema: &Schema, payload: &Value) -> Result<Map<String, Value>, ValidationError> {
    let object = match payload {
        Value::Object(object) => object,
        other => {
            return Err(ValidationError::single(
                schema.name(),
                ROOT_FIELD,
                format!("Expected object, received {}", kind_of(other)),
            ))
        }
    };

    let mut accepted = Map::new();
    let mut issues = Vec::new();

    for field in schema.fields() {
        match object.get(&field.name) {
            None => {
                if field.is_required() {
                    issues.push(FieldIssue::new(&field.name, "Required"));
                }
            }
            Some(value) => match check_field(field, value) {
                Ok(()) => {
                    accepted.insert(field.name.clone(), value.clone());
                }
                Err(message) => issues.push(FieldIssue::new(&field.name, message)),
            },
        }
    }

    if issues.is_empty() {
        Ok(accepted)
    } else {
        Err(ValidationError {
            context: schema.name().to_string(),
            issues,
        })
    }
}

/// Validate, then build the typed record from the accepted fields.
pub fn validate_into<T: DeserializeOwned>(schema: &Schema, payload: &Value) -> Result<T, ValidationError> {
    let accepted = validate(schema, payload)?;
    serde_json::from_value(Value::Object(accepted))
        .map_err(|e| ValidationError::single(schema.name(), ROOT_FIELD, e.to_string()))
}

fn check_field(field: &FieldDefinition, value: &Value) -> Result<(), String> {
    check_type(field.type_, value)?;

    for rule in &field.validation_rules {
        match (rule, value) {
            (ValidationRule::Length { min, max }, Value::String(text)) => {
                let len = text.chars().count();
                if len < *min {
                    return Err(format!("String must contain at least {} character(s)", min));
                }
                if len > *max {
                    return Err(format!("String must contain at most {} character(s)", max));
                }
            }
            (ValidationRule::Positive, Value::Number(n)) => {
                if !n.as_f64().is_some_and(|v| v > 0.0) {
                    return Err("Number must be greater than 0".to_string());
                }
            }
            (ValidationRule::Max(max), Value::Number(n)) => {
                if !n.as_f64().is_some_and(|v| v <= *max) {
                    return Err(format!("Number must be less than or equal to {}", max));
                }
            }
            _ => {}
        }
    }

    Ok(())
}

fn check_type(expected: FieldType, value: &Value) -> Result<(), String> {
    let mismatch = || format!("Expected {}, received {}", expected.as_str(), kind_of(value));

    match expected {
        FieldType::Text => value.is_string().then_some(()).ok_or_else(mismatch),
        FieldType::Number => is_finite_number(value).then_some(()).ok_or_else(mismatch),
        FieldType::NumberPair => {
            let items = value.as_array().ok_or_else(mismatch)?;
            if items.len() != 2 {
                return Err(format!("Expected exactly 2 items, received {}", items.len()));
            }
            match items.iter().position(|v| !is_finite_number(v)) {
                Some(index) => Err(format!(
                    "Expected number at index {}, received {}",
                    index,
                    kind_of(&items[index])
                )),
                None => Ok(()),
            }
        }
    }
}

fn is_finite_number(value: &Value) -> bool {
    value.as_f64().is_some_and(f64::is_finite)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn place_schema() -> Schema {
        Schema::new("Place")
            .with_field(FieldDefinition::text("name", 3, 10))
            .with_field(
                FieldDefinition::new("rating", FieldType::Number)
                    .with_validation(ValidationRule::Required)
                    .with_validation(ValidationRule::Positive),
            )
            .with_field(
                FieldDefinition::new("position", FieldType::NumberPair)
                    .with_validation(ValidationRule::Required),
            )
            .with_field(FieldDefinition::new("note", FieldType::Text))
    }

    fn valid_payload() -> Value {
        json!({ "name": "Cafe", "rating": 4.5, "position": [1.0, 2.0] })
    }

    #[test]
    fn test_validate_valid_payload() {
        let accepted = validate(&place_schema(), &valid_payload()).unwrap();

        assert_eq!(accepted.len(), 3);
        assert_eq!(accepted["name"], json!("Cafe"));
    }

    #[test]
    fn test_validate_strips_unknown_fields() {
        let mut payload = valid_payload();
        payload["extra"] = json!("ignored");

        let accepted = validate(&place_schema(), &payload).unwrap();
        assert!(!accepted.contains_key("extra"));
    }

    #[test]
    fn test_validate_keeps_optional_field_when_present() {
        let mut payload = valid_payload();
        payload["note"] = json!("quiet");

        let accepted = validate(&place_schema(), &payload).unwrap();
        assert_eq!(accepted["note"], json!("quiet"));
    }

    #[test]
    fn test_validate_missing_required() {
        let err = validate(&place_schema(), &json!({ "rating": 1, "position": [0, 0] })).unwrap_err();

        assert_eq!(err.context, "Place");
        assert_eq!(err.fields(), vec!["name"]);
        assert_eq!(err.issues[0].message, "Required");
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let err = validate(&place_schema(), &json!({ "name": "x", "rating": -1 })).unwrap_err();

        assert_eq!(err.fields(), vec!["name", "rating", "position"]);
    }

    #[test]
    fn test_validate_length_bounds() {
        let schema = place_schema();
        let mut payload = valid_payload();

        payload["name"] = json!("abc");
        assert!(validate(&schema, &payload).is_ok());

        payload["name"] = json!("abcdefghij");
        assert!(validate(&schema, &payload).is_ok());

        payload["name"] = json!("ab");
        let err = validate(&schema, &payload).unwrap_err();
        assert!(err.issues[0].message.contains("at least 3"));

        payload["name"] = json!("abcdefghijk");
        let err = validate(&schema, &payload).unwrap_err();
        assert!(err.issues[0].message.contains("at most 10"));
    }

    #[test]
    fn test_validate_length_counts_characters() {
        let mut payload = valid_payload();
        // Three characters, more than three bytes
        payload["name"] = json!("ééé");

        assert!(validate(&place_schema(), &payload).is_ok());
    }

    #[test]
    fn test_validate_positive() {
        let schema = place_schema();
        let mut payload = valid_payload();

        payload["rating"] = json!(0);
        assert!(validate(&schema, &payload).unwrap_err().has_issue_for("rating"));

        payload["rating"] = json!(-0.01);
        assert!(validate(&schema, &payload).unwrap_err().has_issue_for("rating"));

        payload["rating"] = json!(0.01);
        assert!(validate(&schema, &payload).is_ok());
    }

    #[test]
    fn test_validate_max() {
        let schema = place_schema().with_field(
            FieldDefinition::new("rating", FieldType::Number)
                .with_validation(ValidationRule::Required)
                .with_validation(ValidationRule::Max(5.0)),
        );
        let mut payload = valid_payload();

        payload["rating"] = json!(5);
        assert!(validate(&schema, &payload).is_ok());

        payload["rating"] = json!(5.01);
        let err = validate(&schema, &payload).unwrap_err();
        assert_eq!(err.fields(), vec!["rating"]);
        assert_eq!(err.issues[0].message, "Number must be less than or equal to 5");
    }

    #[test]
    fn test_validate_no_type_coercion() {
        let schema = place_schema();

        let mut payload = valid_payload();
        payload["rating"] = json!("4.5");
        let err = validate(&schema, &payload).unwrap_err();
        assert_eq!(err.issues[0].message, "Expected number, received string");

        let mut payload = valid_payload();
        payload["name"] = json!(1234);
        assert!(validate(&schema, &payload).unwrap_err().has_issue_for("name"));

        let mut payload = valid_payload();
        payload["name"] = Value::Null;
        let err = validate(&schema, &payload).unwrap_err();
        assert_eq!(err.issues[0].message, "Expected string, received null");
    }

    #[test]
    fn test_validate_number_pair() {
        let schema = place_schema();
        let mut payload = valid_payload();

        payload["position"] = json!([1.0]);
        let err = validate(&schema, &payload).unwrap_err();
        assert_eq!(err.issues[0].message, "Expected exactly 2 items, received 1");

        payload["position"] = json!([1.0, 2.0, 3.0]);
        assert!(validate(&schema, &payload).unwrap_err().has_issue_for("position"));

        payload["position"] = json!([1.0, "2"]);
        let err = validate(&schema, &payload).unwrap_err();
        assert!(err.issues[0].message.contains("index 1"));

        payload["position"] = json!({ "lat": 1.0, "lng": 2.0 });
        assert!(validate(&schema, &payload).unwrap_err().has_issue_for("position"));
    }

    #[test]
    fn test_validate_rejects_non_object() {
        let err = validate(&place_schema(), &json!([1, 2, 3])).unwrap_err();

        assert_eq!(err.fields(), vec![ROOT_FIELD]);
        assert_eq!(err.issues[0].message, "Expected object, received array");
    }

    #[test]
    fn test_validate_into_typed_record() {
        #[derive(Debug, Deserialize)]
        struct Place {
            name: String,
            rating: f64,
            position: [f64; 2],
        }

        let place: Place = validate_into(&place_schema(), &valid_payload()).unwrap();
        assert_eq!(place.name, "Cafe");
        assert_eq!(place.rating, 4.5);
        assert_eq!(place.position, [1.0, 2.0]);
    }

    #[test]
    fn test_error_display_lists_issues() {
        let err = validate(&place_schema(), &json!({ "rating": 1, "position": [0, 0], "name": "ab" }))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "invalid Place: name: String must contain at least 3 character(s)"
        );
    }
}
