//! Schema Validation Module
//!
//! Wraps the generic JSON-schema engine behind [`SchemaValidator`] and adapts
//! memory documents to it through the canonical record.

use crate::error::{MifError, Result};
use crate::models::memory::MemoryDocument;
use crate::transform::memory::FieldMapper;
use jsonschema::{Draft, JSONSchema, ValidationError, error::ValidationErrorKind};
use serde_json::Value;
use std::path::Path;

/// Field that carries the record body in canonical form
pub const CONTENT_FIELD: &str = "content";

/// One violation reported by the schema engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON path of the offending instance, e.g. `$.citations[0]`
    pub path: String,
    pub message: String,
    /// Set when the violation is a missing required property
    pub missing_property: Option<String>,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            missing_property: None,
        }
    }

    pub fn missing(path: impl Into<String>, property: &str) -> Self {
        Self {
            path: path.into(),
            message: format!("\"{property}\" is a required property"),
            missing_property: Some(property.to_string()),
        }
    }

    /// Whether this violation is about the top-level `field` of the instance
    pub fn concerns_top_level(&self, field: &str) -> bool {
        if self.path == "$" {
            return self.missing_property.as_deref() == Some(field);
        }
        json_path_head(&self.path) == Some(field)
    }
}

/// First member name of a `$.a.b[0]` style path
fn json_path_head(path: &str) -> Option<&str> {
    let rest = path.strip_prefix("$.")?;
    let end = rest.find(['.', '[']).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Render a JSON pointer (`/a/0/b`) as a JSON path (`$.a[0].b`)
pub fn pointer_to_json_path(pointer: &str) -> String {
    let mut path = String::from("$");
    for segment in pointer.split('/').skip(1) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            path.push('[');
            path.push_str(&segment);
            path.push(']');
        } else {
            path.push('.');
            path.push_str(&segment);
        }
    }
    path
}

/// External schema engine seam
pub trait SchemaValidator {
    /// Every violation of `instance`; empty when valid
    fn violations(&self, instance: &Value) -> Vec<SchemaViolation>;
}

/// Draft 2020-12 validator backed by the `jsonschema` crate
pub struct JsonSchemaValidator {
    compiled: JSONSchema,
}

impl JsonSchemaValidator {
    pub fn compile(schema: &Value) -> Result<Self> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft202012)
            .compile(schema)
            .map_err(|e| MifError::Schema(e.to_string()))?;
        Ok(Self { compiled })
    }

    /// Load and compile a schema file; a missing file is [`MifError::NotFound`]
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MifError::NotFound(format!(
                "schema not found: {}",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)?;
        let schema: Value = serde_json::from_str(&text)?;
        Self::compile(&schema)
    }
}

fn to_violation(error: ValidationError<'_>) -> SchemaViolation {
    let path = pointer_to_json_path(&error.instance_path.to_string());
    let missing_property = match &error.kind {
        ValidationErrorKind::Required { property } => property.as_str().map(str::to_string),
        _ => None,
    };
    SchemaViolation {
        path,
        message: error.to_string(),
        missing_property,
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn violations(&self, instance: &Value) -> Vec<SchemaViolation> {
        match self.compiled.validate(instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.map(to_violation).collect(),
        }
    }
}

/// Builds canonical records and checks them against a schema
pub struct ValidationAdapter<'a, V: SchemaValidator + ?Sized> {
    validator: &'a V,
    mapper: &'a FieldMapper,
}

impl<'a, V: SchemaValidator + ?Sized> ValidationAdapter<'a, V> {
    pub fn new(validator: &'a V, mapper: &'a FieldMapper) -> Self {
        Self { validator, mapper }
    }

    /// Violations of the document's canonical record.
    ///
    /// Violations about `content` are dropped when the body is non-empty: the
    /// body is always supplied separately from the header.
    pub fn validate(&self, doc: &MemoryDocument) -> Vec<SchemaViolation> {
        let record = Value::Object(self.mapper.canonical_record(doc));
        self.validator
            .violations(&record)
            .into_iter()
            .filter(|violation| doc.body.is_empty() || !violation.concerns_top_level(CONTENT_FIELD))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Reports a fixed set of violations regardless of input
    struct FixedValidator(Vec<SchemaViolation>);

    impl SchemaValidator for FixedValidator {
        fn violations(&self, _instance: &Value) -> Vec<SchemaViolation> {
            self.0.clone()
        }
    }

    fn doc(body: &str) -> MemoryDocument {
        MemoryDocument::parse(&format!("---\nid: a\n---\n{body}")).unwrap()
    }

    #[test]
    fn test_pointer_to_json_path() {
        assert_eq!(pointer_to_json_path(""), "$");
        assert_eq!(pointer_to_json_path("/content"), "$.content");
        assert_eq!(
            pointer_to_json_path("/citations/0/citationType"),
            "$.citations[0].citationType"
        );
        assert_eq!(pointer_to_json_path("/a~1b"), "$.a/b");
    }

    #[test]
    fn test_missing_content_suppressed_with_body() {
        let validator = FixedValidator(vec![SchemaViolation::missing("$", CONTENT_FIELD)]);
        let mapper = FieldMapper::default();
        let adapter = ValidationAdapter::new(&validator, &mapper);

        assert!(adapter.validate(&doc("hello")).is_empty());
        assert_eq!(adapter.validate(&doc("")).len(), 1);
    }

    #[test]
    fn test_other_violations_kept() {
        let validator = FixedValidator(vec![
            SchemaViolation::new("$.content", "too short"),
            SchemaViolation::new("$.namespace", "bad pattern"),
            SchemaViolation::new("$.blocks[0].content", "nested"),
            SchemaViolation::missing("$", "title"),
        ]);
        let mapper = FieldMapper::default();
        let adapter = ValidationAdapter::new(&validator, &mapper);

        let paths: Vec<String> = adapter
            .validate(&doc("body"))
            .into_iter()
            .map(|v| v.path)
            .collect();
        assert_eq!(paths, vec!["$.namespace", "$.blocks[0].content", "$"]);
    }

    #[test]
    fn test_json_schema_validator_reports_required() {
        let validator = JsonSchemaValidator::compile(&json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "required": ["@id", "content"],
            "properties": {
                "tags": {"type": "array", "items": {"type": "string"}}
            }
        }))
        .unwrap();

        let violations = validator.violations(&json!({"tags": ["a", 1]}));
        assert!(violations
            .iter()
            .any(|v| v.missing_property.as_deref() == Some("content") && v.path == "$"));
        assert!(violations.iter().any(|v| v.path == "$.tags[1]"));
    }

    #[test]
    fn test_adapter_with_real_schema() {
        let validator = JsonSchemaValidator::compile(&json!({
            "type": "object",
            "required": ["@id", "content"],
            "properties": {"content": {"type": "string", "minLength": 1}}
        }))
        .unwrap();
        let mapper = FieldMapper::default();
        let adapter = ValidationAdapter::new(&validator, &mapper);

        assert!(adapter.validate(&doc("hello")).is_empty());
        let violations = adapter.validate(&doc(""));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "$.content");
    }

    #[test]
    fn test_missing_schema_file() {
        let err = JsonSchemaValidator::from_file(Path::new("/nonexistent/schema.json"))
            .err()
            .unwrap();
        assert!(matches!(err, MifError::NotFound(_)));
    }
}
