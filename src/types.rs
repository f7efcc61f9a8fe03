use serde_json::{json, Map, Value};

/// Simple type system for structured model output.
#[derive(Debug, Clone)]
pub enum TypeDef {
    Text,
    /// A string that must contain at least one non-whitespace character.
    NonEmptyText,
    Number,
    /// A whole number within an inclusive range. `55.0` counts as whole.
    Integer { min: i64, max: i64 },
    Bool,
    /// A string restricted to a closed set of literals (case-sensitive).
    Enum(&'static [&'static str]),
    List(Box<TypeDef>),
    Object(Vec<FieldDef>),
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: TypeDef,
    pub required: bool,
    pub description: Option<&'static str>,
}

impl FieldDef {
    pub fn required(name: &'static str, ty: TypeDef) -> Self {
        Self {
            name,
            ty,
            required: true,
            description: None,
        }
    }

    /// Declared in the outgoing schema as required, but tolerated when absent
    /// or null on the way back in.
    pub fn lenient(name: &'static str, ty: TypeDef) -> Self {
        Self {
            name,
            ty,
            required: false,
            description: None,
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

/// Single validation error, with a JSON path.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingField {
        path: String,
    },
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
    EmptyText {
        path: String,
    },
    UnknownLiteral {
        path: String,
        found: String,
        allowed: &'static [&'static str],
    },
    OutOfRange {
        path: String,
        value: f64,
        min: i64,
        max: i64,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingField { path } => {
                write!(f, "Missing required field at path {path}")
            }
            ValidationError::TypeMismatch {
                path,
                expected,
                found,
            } => {
                write!(f, "Type mismatch at {path}: expected {expected}, found {found}")
            }
            ValidationError::EmptyText { path } => {
                write!(f, "Empty string at {path}")
            }
            ValidationError::UnknownLiteral {
                path,
                found,
                allowed,
            } => {
                write!(
                    f,
                    "Unknown value {found:?} at {path}: expected one of {}",
                    allowed.join(", ")
                )
            }
            ValidationError::OutOfRange {
                path,
                value,
                min,
                max,
            } => {
                write!(f, "Value {value} at {path} is outside [{min}, {max}]")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a serde_json::Value against a TypeDef.
///
/// Returns Ok(()) if everything matches, or Err(vec![]) with one or more errors.
pub fn validate(ty: &TypeDef, value: &Value) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    validate_inner(ty, value, "$", &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_inner(ty: &TypeDef, value: &Value, path: &str, errors: &mut Vec<ValidationError>) {
    use TypeDef::*;

    match ty {
        Text => {
            if !value.is_string() {
                errors.push(mismatch(path, "string", value));
            }
        }
        NonEmptyText => match value.as_str() {
            Some(s) if s.trim().is_empty() => errors.push(ValidationError::EmptyText {
                path: path.to_string(),
            }),
            Some(_) => {}
            None => errors.push(mismatch(path, "string", value)),
        },
        Number => {
            if !value.is_number() {
                errors.push(mismatch(path, "number", value));
            }
        }
        Integer { min, max } => {
            let Some(n) = value.as_f64() else {
                errors.push(mismatch(path, "integer", value));
                return;
            };
            if n.fract() != 0.0 {
                errors.push(ValidationError::TypeMismatch {
                    path: path.to_string(),
                    expected: "integer",
                    found: "fractional number",
                });
            } else if n < *min as f64 || n > *max as f64 {
                errors.push(ValidationError::OutOfRange {
                    path: path.to_string(),
                    value: n,
                    min: *min,
                    max: *max,
                });
            }
        }
        Bool => {
            if !value.is_boolean() {
                errors.push(mismatch(path, "boolean", value));
            }
        }
        Enum(allowed) => match value.as_str() {
            Some(s) if allowed.iter().any(|literal| *literal == s) => {}
            Some(s) => errors.push(ValidationError::UnknownLiteral {
                path: path.to_string(),
                found: s.to_string(),
                allowed: *allowed,
            }),
            None => errors.push(mismatch(path, "string", value)),
        },
        List(inner) => {
            if let Value::Array(items) = value {
                for (idx, item) in items.iter().enumerate() {
                    let child_path = format!("{path}[{idx}]");
                    validate_inner(inner, item, &child_path, errors);
                }
            } else {
                errors.push(mismatch(path, "array", value));
            }
        }
        Object(fields) => {
            let Some(obj) = value.as_object() else {
                errors.push(mismatch(path, "object", value));
                return;
            };

            for field in fields {
                let field_path = format!("{path}.{}", field.name);

                match obj.get(field.name) {
                    None | Some(Value::Null) if !field.required => {}
                    None => {
                        errors.push(ValidationError::MissingField { path: field_path });
                    }
                    Some(v) => {
                        validate_inner(&field.ty, v, &field_path, errors);
                    }
                }
            }

            // Extra fields are ignored (lenient).
        }
    }
}

fn mismatch(path: &str, expected: &'static str, found: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        path: path.to_string(),
        expected,
        found: value_type_name(found),
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a TypeDef as a Gemini `responseSchema` (OpenAPI subset).
///
/// Every field is emitted as required, including lenient ones: the provider
/// should always fill them, the parser just doesn't insist.
pub fn to_gemini_schema(ty: &TypeDef) -> Value {
    use TypeDef::*;

    match ty {
        Text | NonEmptyText => json!({ "type": "STRING" }),
        Number | Integer { .. } => json!({ "type": "NUMBER" }),
        Bool => json!({ "type": "BOOLEAN" }),
        Enum(allowed) => json!({ "type": "STRING", "enum": allowed }),
        List(inner) => json!({ "type": "ARRAY", "items": to_gemini_schema(inner) }),
        Object(fields) => {
            let mut properties = Map::new();
            for f in fields {
                let mut schema = to_gemini_schema(&f.ty);
                if let (Some(desc), Some(obj)) = (f.description, schema.as_object_mut()) {
                    obj.insert("description".to_string(), Value::from(desc));
                }
                properties.insert(f.name.to_string(), schema);
            }
            let names: Vec<&str> = fields.iter().map(|f| f.name).collect();
            json!({
                "type": "OBJECT",
                "properties": properties,
                "required": names,
                "propertyOrdering": names,
            })
        }
    }
}

// Human-readable schema description for the prompt.
pub fn describe_schema(ty: &TypeDef, indent: usize) -> String {
    use TypeDef::*;
    let mut s = String::new();
    let pad = " ".repeat(indent);

    match ty {
        List(inner) => {
            s.push_str(&format!("{pad}- array of:\n"));
            s.push_str(&describe_schema(inner, indent + 2));
        }
        Object(fields) => {
            s.push_str(&format!("{pad}- object with fields:\n"));
            for f in fields {
                s.push_str(&format!("{pad}  - {}: ", f.name));
                match &f.ty {
                    List(inner) => {
                        s.push_str("array of:\n");
                        s.push_str(&describe_schema(inner, indent + 4));
                    }
                    Object(_) => {
                        s.push_str("nested object:\n");
                        s.push_str(&describe_schema(&f.ty, indent + 4));
                    }
                    scalar => {
                        s.push_str(&scalar_label(scalar));
                        s.push('\n');
                    }
                }
            }
        }
        scalar => s.push_str(&format!("{pad}- {}\n", scalar_label(scalar))),
    }

    s
}

fn scalar_label(ty: &TypeDef) -> String {
    use TypeDef::*;

    match ty {
        Text => "string".to_string(),
        NonEmptyText => "non-empty string".to_string(),
        Number => "number".to_string(),
        Integer { min, max } => format!("integer {min}-{max}"),
        Bool => "boolean".to_string(),
        Enum(allowed) => format!("one of {}", allowed.join(" | ")),
        List(_) => "array".to_string(),
        Object(_) => "object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TypeDef {
        TypeDef::Object(vec![
            FieldDef::required("name", TypeDef::NonEmptyText),
            FieldDef::required("level", TypeDef::Enum(&["High", "Low"])),
            FieldDef::required("score", TypeDef::Integer { min: 0, max: 100 }),
            FieldDef::lenient("note", TypeDef::Text),
        ])
    }

    #[test]
    fn test_valid_object_passes() {
        let value = json!({ "name": "a", "level": "High", "score": 40 });
        assert!(validate(&sample(), &value).is_ok());
    }

    #[test]
    fn test_whole_float_counts_as_integer() {
        let value = json!({ "name": "a", "level": "Low", "score": 55.0 });
        assert!(validate(&sample(), &value).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let value = json!({ "name": " ", "level": "high", "score": 101 });
        let errors = validate(&sample(), &value).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ValidationError::EmptyText { .. }));
        assert!(matches!(errors[1], ValidationError::UnknownLiteral { .. }));
        assert!(matches!(errors[2], ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn test_fractional_and_string_scores_rejected() {
        let value = json!({ "name": "a", "level": "High", "score": 12.5 });
        assert!(validate(&sample(), &value).is_err());

        let value = json!({ "name": "a", "level": "High", "score": "12" });
        let errors = validate(&sample(), &value).unwrap_err();
        assert_eq!(
            errors[0].to_string(),
            "Type mismatch at $.score: expected integer, found string"
        );
    }

    #[test]
    fn test_lenient_field_may_be_missing_or_null() {
        let value = json!({ "name": "a", "level": "High", "score": 1, "note": null });
        assert!(validate(&sample(), &value).is_ok());

        let value = json!({ "name": "a", "level": "High", "score": 1, "note": 3 });
        assert!(validate(&sample(), &value).is_err());
    }

    #[test]
    fn test_missing_required_field_reports_path() {
        let value = json!({ "level": "High", "score": 1 });
        let errors = validate(&sample(), &value).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::MissingField {
                path: "$.name".to_string()
            }]
        );
    }

    #[test]
    fn test_gemini_schema_marks_all_fields_required() {
        let schema = to_gemini_schema(&sample());
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["required"], json!(["name", "level", "score", "note"]));
        assert_eq!(schema["properties"]["level"]["enum"], json!(["High", "Low"]));
        assert_eq!(schema["properties"]["score"]["type"], "NUMBER");
    }

    #[test]
    fn test_describe_schema_lists_enum_literals() {
        let text = describe_schema(&sample(), 0);
        assert!(text.contains("- level: one of High | Low"));
        assert!(text.contains("- score: integer 0-100"));
    }
}
