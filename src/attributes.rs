// 🏛️ Field Layer - Field Definitions & Schemas
// A field says what a value is and how it is checked; schemas only reference fields

use serde::{Deserialize, Serialize};

// ============================================================================
// FIELD TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// JSON string
    Text,
    /// Finite JSON number
    Number,
    /// Array of exactly two numbers, e.g. [lat, lng]
    NumberPair,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "string",
            FieldType::Number => "number",
            FieldType::NumberPair => "[number, number]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationRule {
    Required,
    /// Inclusive bounds on the number of characters of a text field
    Length { min: usize, max: usize },
    /// Strictly greater than zero
    Positive,
    /// Inclusive upper bound on a number
    Max(f64),
}

// ============================================================================
// FIELD DEFINITION
// ============================================================================

/// FieldDefinition - one named, typed slot of a record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Wire name (e.g., "expenseType")
    pub name: String,

    /// Type of value this field holds
    pub type_: FieldType,

    /// What does this field mean?
    pub description: String,

    /// How should this be validated?
    pub validation_rules: Vec<ValidationRule>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, type_: FieldType) -> Self {
        FieldDefinition {
            name: name.into(),
            type_,
            description: String::new(),
            validation_rules: Vec::new(),
        }
    }

    /// Builder: add description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: add validation rule
    pub fn with_validation(mut self, rule: ValidationRule) -> Self {
        self.validation_rules.push(rule);
        self
    }

    /// Shorthand for a required text field with a character range
    pub fn text(name: impl Into<String>, min: usize, max: usize) -> Self {
        FieldDefinition::new(name, FieldType::Text)
            .with_validation(ValidationRule::Required)
            .with_validation(ValidationRule::Length { min, max })
    }

    pub fn is_required(&self) -> bool {
        self.validation_rules.contains(&ValidationRule::Required)
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Schema - ordered list of fields a payload must satisfy
///
/// Field order is the order issues are reported in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    name: String,
    fields: Vec<FieldDefinition>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Schema {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder: append a field (replaces an existing field with the same name)
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.retain(|f| f.name != field.name);
        self.fields.push(field);
        self
    }

    /// Same schema minus one field
    ///
    /// Used to derive create schemas, which never accept server-assigned fields.
    pub fn without(&self, name: &str) -> Self {
        Schema {
            name: self.name.clone(),
            fields: self
                .fields
                .iter()
                .filter(|f| f.name != name)
                .cloned()
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn count(&self) -> usize {
        self.fields.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        Schema::new("Sample")
            .with_field(
                FieldDefinition::new("id", FieldType::Number)
                    .with_validation(ValidationRule::Required)
                    .with_validation(ValidationRule::Positive),
            )
            .with_field(FieldDefinition::text("title", 3, 100))
    }

    #[test]
    fn test_field_builder_pattern() {
        let field = FieldDefinition::new("amount", FieldType::Number)
            .with_description("Money spent")
            .with_validation(ValidationRule::Required)
            .with_validation(ValidationRule::Positive);

        assert_eq!(field.description, "Money spent");
        assert_eq!(field.validation_rules.len(), 2);
        assert!(field.is_required());
    }

    #[test]
    fn test_text_shorthand() {
        let field = FieldDefinition::text("name", 3, 100);

        assert_eq!(field.type_, FieldType::Text);
        assert!(field.is_required());
        assert!(field
            .validation_rules
            .contains(&ValidationRule::Length { min: 3, max: 100 }));
    }

    #[test]
    fn test_optional_field() {
        let field = FieldDefinition::new("note", FieldType::Text);
        assert!(!field.is_required());
    }

    #[test]
    fn test_schema_lookup() {
        let schema = sample_schema();

        assert_eq!(schema.count(), 2);
        assert_eq!(schema.name(), "Sample");
        assert!(schema.get("title").is_some());
        assert!(schema.get("missing").is_none());
    }

    #[test]
    fn test_schema_without_drops_field() {
        let full = sample_schema();
        let create = full.without("id");

        assert_eq!(create.count(), 1);
        assert!(create.get("id").is_none());
        // Full schema untouched
        assert!(full.get("id").is_some());
    }

    #[test]
    fn test_with_field_replaces_same_name() {
        let schema = sample_schema().with_field(FieldDefinition::text("title", 1, 5));

        assert_eq!(schema.count(), 2);
        let title = schema.get("title").unwrap();
        assert!(title
            .validation_rules
            .contains(&ValidationRule::Length { min: 1, max: 5 }));
        // Replaced field moves to the end
        assert_eq!(schema.fields()[1].name, "title");
    }

    #[test]
    fn test_number_bounds() {
        let field = FieldDefinition::new("amount", FieldType::Number)
            .with_validation(ValidationRule::Positive)
            .with_validation(ValidationRule::Max(1e15));

        assert!(field.validation_rules.contains(&ValidationRule::Max(1e15)));
        assert!(!field.is_required());
    }
}
