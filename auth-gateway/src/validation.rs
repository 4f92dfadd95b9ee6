//! Validation gate
//!
//! Runs before the guard for every mutating request. Input is checked against
//! a [`Schema`] and every failing field is reported in one pass, keyed by field
//! path, so the client gets a complete `details` map.
//!
//! Only declared fields survive into [`ValidatedInput`]; anything else the
//! client sent is dropped before the guard or a handler can see it.

use crate::config::ValidationConfig;
use error_common::{AppError, FieldErrors};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{Validate, ValidateEmail, ValidationErrors, ValidationErrorsKind};

/// Key used for errors about the body as a whole
pub const BODY_FIELD: &str = "body";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
}

impl ValueType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Integer => value.is_i64() || value.is_u64(),
            ValueType::Number => value.is_number(),
            ValueType::Boolean => value.is_boolean(),
            ValueType::Array => value.is_array(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ValueType::String => "a string",
            ValueType::Integer => "an integer",
            ValueType::Number => "a number",
            ValueType::Boolean => "a boolean",
            ValueType::Array => "an array",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Rule {
    /// Present, not null, and not blank when a string
    Required,
    Type(ValueType),
    /// Minimum length in characters (strings) or items (arrays)
    MinLength(usize),
    MaxLength(usize),
    /// String must match; the description is used in the message
    Pattern(Regex, String),
    /// Lowercase alphanumeric words joined by single hyphens
    Slug,
    Email,
    /// Nested object validated against its own schema
    Object(Schema),
}

#[derive(Debug, Clone)]
struct FieldSpec {
    name: String,
    rules: Vec<Rule>,
}

impl FieldSpec {
    fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, Rule::Required))
    }
}

/// Declarative description of an accepted request body
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    max_string_length: Option<usize>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            rules: rules.into_iter().collect(),
        });
        self
    }

    /// Cap every string field, in addition to per-field rules
    pub fn max_string_length(mut self, max: usize) -> Self {
        self.max_string_length = Some(max);
        self
    }

    /// Apply deployment-wide limits to this schema and every nested one.
    ///
    /// A cap already set on the schema is kept when it is tighter.
    pub fn with_limits(mut self, limits: &ValidationConfig) -> Self {
        let cap = self
            .max_string_length
            .map_or(limits.max_string_length, |own| own.min(limits.max_string_length));
        self.max_string_length = Some(cap);

        for field in &mut self.fields {
            for rule in &mut field.rules {
                if let Rule::Object(inner) = rule {
                    *inner = std::mem::take(inner).with_limits(limits);
                }
            }
        }
        self
    }

    fn check(&self, object: &Map<String, Value>, prefix: &str, errors: &mut FieldErrors) -> Map<String, Value> {
        let mut accepted = Map::new();

        for field in &self.fields {
            let path = if prefix.is_empty() {
                field.name.clone()
            } else {
                format!("{}.{}", prefix, field.name)
            };

            let value = match object.get(&field.name) {
                Some(value) if !value.is_null() => value,
                _ => {
                    if field.is_required() {
                        push(errors, &path, format!("{} is required", field.name));
                    }
                    continue;
                }
            };

            let before = message_count(errors);
            let cleaned = self.check_value(field, value, &path, errors);
            if message_count(errors) == before {
                accepted.insert(field.name.clone(), cleaned);
            }
        }

        accepted
    }

    fn check_value(&self, field: &FieldSpec, value: &Value, path: &str, errors: &mut FieldErrors) -> Value {
        let mut cleaned = value.clone();

        if let (Some(max), Some(s)) = (self.max_string_length, value.as_str()) {
            if s.chars().count() > max {
                push(errors, path, format!("{} must be at most {} characters", field.name, max));
            }
        }

        for rule in &field.rules {
            match rule {
                Rule::Required => {
                    if value.as_str().is_some_and(|s| s.trim().is_empty()) {
                        push(errors, path, format!("{} is required", field.name));
                        // Remaining rules would only repeat the same complaint
                        break;
                    }
                }
                Rule::Type(expected) => {
                    if !expected.matches(value) {
                        push(errors, path, format!("{} must be {}", field.name, expected.name()));
                    }
                }
                Rule::MinLength(min) => {
                    if let Some(len) = length_of(value) {
                        if len < *min {
                            push(errors, path, format!("{} must be at least {} characters", field.name, min));
                        }
                    }
                }
                Rule::MaxLength(max) => {
                    if let Some(len) = length_of(value) {
                        if len > *max {
                            push(errors, path, format!("{} must be at most {} characters", field.name, max));
                        }
                    }
                }
                Rule::Pattern(regex, description) => match value.as_str() {
                    Some(s) if regex.is_match(s) => {}
                    _ => push(errors, path, format!("{} must be {}", field.name, description)),
                },
                Rule::Slug => {
                    if !value.as_str().is_some_and(is_slug) {
                        push(
                            errors,
                            path,
                            format!("{} must contain only lowercase letters, digits and hyphens", field.name),
                        );
                    }
                }
                Rule::Email => {
                    if !value.as_str().is_some_and(|s| s.validate_email()) {
                        push(errors, path, format!("{} must be a valid email address", field.name));
                    }
                }
                Rule::Object(schema) => match value.as_object() {
                    Some(inner) => cleaned = Value::Object(schema.check(inner, path, errors)),
                    None => push(errors, path, format!("{} must be an object", field.name)),
                },
            }
        }

        cleaned
    }
}

fn push(errors: &mut FieldErrors, path: &str, message: String) {
    errors.entry(path.to_string()).or_default().push(message);
}

fn message_count(errors: &FieldErrors) -> usize {
    errors.values().map(Vec::len).sum()
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn is_slug(s: &str) -> bool {
    !s.is_empty()
        && s.split('-')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()))
}

/// Input that passed its schema. Holds only declared fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    fields: Map<String, Value>,
}

impl ValidatedInput {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Deserialize into a typed request
    ///
    /// # Errors
    ///
    /// Returns VALIDATION_ERROR when the accepted fields do not fit `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }
}

/// Check `raw` against `schema`, collecting every field error.
///
/// # Errors
///
/// Returns VALIDATION_ERROR with a `details` entry per failing field path.
pub fn validate(schema: &Schema, raw: &Value) -> Result<ValidatedInput, AppError> {
    let mut errors = FieldErrors::new();

    let Some(object) = raw.as_object() else {
        errors.insert(BODY_FIELD.to_string(), vec!["Expected a JSON object".to_string()]);
        return Err(AppError::validation(errors));
    };

    let fields = schema.check(object, "", &mut errors);

    if errors.is_empty() {
        Ok(ValidatedInput { fields })
    } else {
        Err(AppError::validation(errors))
    }
}

/// Validate a typed request deriving [`validator::Validate`]
///
/// # Errors
///
/// Returns VALIDATION_ERROR with the same `details` shape as [`validate`].
pub fn validate_request<T: Validate>(request: T) -> Result<T, AppError> {
    match request.validate() {
        Ok(()) => Ok(request),
        Err(errors) => Err(AppError::validation(field_errors_from(&errors))),
    }
}

/// Flatten `validator` errors into dotted field paths
pub fn field_errors_from(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    flatten(errors, "", &mut out);
    out
}

fn flatten(errors: &ValidationErrors, prefix: &str, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid ({})", field, error.code));
                    push(out, &path, message);
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error_common::ErrorKind;
    use serde_json::json;

    fn author_schema() -> Schema {
        Schema::new()
            .field("name", [Rule::Required, Rule::MaxLength(120)])
            .field("bio", [Rule::Required])
    }

    #[test]
    fn test_single_empty_field() {
        let schema = Schema::new().field("name", [Rule::Required]);

        let err = validate(&schema, &json!({ "name": "" })).unwrap_err();
        let details = err.details().unwrap();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(details.len(), 1);
        assert_eq!(details["name"].len(), 1);
    }

    #[test]
    fn test_collects_all_fields_in_one_pass() {
        let err = validate(&author_schema(), &json!({ "name": "", "bio": "" })).unwrap_err();
        let details = err.details().unwrap();

        assert_eq!(details.len(), 2);
        assert!(details.contains_key("name"));
        assert!(details.contains_key("bio"));
    }

    #[test]
    fn test_missing_and_null_are_required_failures() {
        let err = validate(&author_schema(), &json!({ "bio": null })).unwrap_err();
        assert_eq!(err.details().unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let input = validate(
            &author_schema(),
            &json!({ "name": "Seneca", "bio": "Stoic", "ownerId": "u-attacker" }),
        )
        .unwrap();

        assert_eq!(input.get_str("name"), Some("Seneca"));
        assert!(input.get("ownerId").is_none());
    }

    #[test]
    fn test_optional_field_may_be_absent() {
        let schema = Schema::new().field("website", [Rule::Pattern(Regex::new("^https://").unwrap(), "an https URL".to_string())]);

        assert!(validate(&schema, &json!({})).is_ok());
        assert!(validate(&schema, &json!({ "website": "http://x" })).is_err());
    }

    #[test]
    fn test_slug_and_email() {
        let schema = Schema::new()
            .field("slug", [Rule::Required, Rule::Slug])
            .field("email", [Rule::Email]);

        assert!(validate(&schema, &json!({ "slug": "marcus-aurelius-2", "email": "m@rome.example" })).is_ok());

        let err = validate(&schema, &json!({ "slug": "Marcus--Aurelius", "email": "nope" })).unwrap_err();
        let details = err.details().unwrap();
        assert!(details.contains_key("slug"));
        assert!(details.contains_key("email"));
    }

    #[test]
    fn test_nested_paths() {
        let schema = Schema::new()
            .field("text", [Rule::Required])
            .field("author", [Rule::Required, Rule::Object(Schema::new().field("name", [Rule::Required]))]);

        let err = validate(&schema, &json!({ "text": "", "author": { "name": " " } })).unwrap_err();
        let details = err.details().unwrap();

        assert!(details.contains_key("text"));
        assert!(details.contains_key("author.name"));
    }

    #[test]
    fn test_type_and_length() {
        let schema = Schema::new()
            .field("tags", [Rule::Type(ValueType::Array), Rule::MaxLength(2)])
            .field("quoteId", [Rule::Required, Rule::Type(ValueType::String), Rule::MinLength(3)]);

        let err = validate(&schema, &json!({ "tags": ["a", "b", "c"], "quoteId": 7 })).unwrap_err();
        let details = err.details().unwrap();

        assert_eq!(details["tags"].len(), 1);
        assert_eq!(details["quoteId"], vec!["quoteId must be a string".to_string()]);
    }

    #[test]
    fn test_global_string_cap() {
        let schema = Schema::new().field("text", [Rule::Required]).max_string_length(5);
        assert!(validate(&schema, &json!({ "text": "toolong" })).is_err());
    }

    #[test]
    fn test_configured_limits_reach_nested_fields() {
        let limits = ValidationConfig { max_string_length: 4 };
        let schema = Schema::new()
            .field("text", [Rule::Required])
            .field("author", [Rule::Object(Schema::new().field("name", [Rule::Required]))])
            .with_limits(&limits);

        let err = validate(&schema, &json!({ "text": "Amor fati", "author": { "name": "Seneca" } })).unwrap_err();
        let details = err.details().unwrap();

        assert!(details.contains_key("text"));
        assert!(details.contains_key("author.name"));
        assert!(validate(&schema, &json!({ "text": "fati", "author": { "name": "Zeno" } })).is_ok());
    }

    #[test]
    fn test_tighter_schema_cap_is_kept() {
        let limits = ValidationConfig { max_string_length: 100 };
        let schema = Schema::new().field("slug", [Rule::Required]).max_string_length(3).with_limits(&limits);

        assert!(validate(&schema, &json!({ "slug": "abcd" })).is_err());
    }

    #[test]
    fn test_non_object_body() {
        let err = validate(&author_schema(), &json!("name")).unwrap_err();
        assert!(err.details().unwrap().contains_key(BODY_FIELD));
    }

    #[test]
    fn test_validator_errors_are_flattened() {
        #[derive(Debug, Validate)]
        struct CreateTag {
            #[validate(length(min = 1, message = "name is required"))]
            name: String,
            #[validate(email)]
            contact: String,
        }

        let err = validate_request(CreateTag {
            name: String::new(),
            contact: "nope".to_string(),
        })
        .unwrap_err();
        let details = err.details().unwrap();

        assert_eq!(details["name"], vec!["name is required".to_string()]);
        assert!(details["contact"][0].contains("contact"));
    }

    #[test]
    fn test_deserialize_validated_input() {
        #[derive(serde::Deserialize)]
        struct Author {
            name: String,
        }

        let input = validate(&author_schema(), &json!({ "name": "Epictetus", "bio": "Enchiridion" })).unwrap();
        let author: Author = input.deserialize().unwrap();
        assert_eq!(author.name, "Epictetus");
    }
}
