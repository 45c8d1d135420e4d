use serde::Serialize;
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

/// One problem with one field of a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// A request body schema: coerces raw JSON into a typed value or lists
/// every field that is wrong.
pub trait Schema: Sized {
    fn parse(value: &Value) -> Result<Self, Vec<FieldError>>;
}

/// Reads typed fields out of a JSON object, collecting shape errors as it goes.
/// Keys that are never asked for are ignored.
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
    pub fn of(value: &'a Value) -> Result<Self, Vec<FieldError>> {
        match value {
            Value::Object(map) => Ok(Self {
                map,
                errors: Vec::new(),
            }),
            _ => Err(vec![FieldError::new(
                "body",
                "type",
                "expected a JSON object",
            )]),
        }
    }

    pub fn required_string(&mut self, name: &str) -> Option<String> {
        self.require(name, Self::optional_string)
    }

    pub fn optional_string(&mut self, name: &str) -> Option<String> {
        match self.map.get(name)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.errors
                    .push(FieldError::new(name, "type", "expected a string"));
                None
            }
        }
    }

    pub fn required_integer(&mut self, name: &str) -> Option<i32> {
        self.require(name, Self::optional_integer)
    }

    /// Accepts a JSON integer or a string of decimal digits that fits in i32.
    pub fn optional_integer(&mut self, name: &str) -> Option<i32> {
        let parsed = match self.map.get(name)? {
            Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<i32>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.errors
                .push(FieldError::new(name, "type", "expected an integer"));
        }
        parsed
    }

    fn require<T>(&mut self, name: &str, read: fn(&mut Self, &str) -> Option<T>) -> Option<T> {
        if !self.map.contains_key(name) {
            self.errors
                .push(FieldError::new(name, "missing", "field required"));
            return None;
        }
        read(self, name)
    }

    /// Runs the `#[validate]` rules on whatever parsed and fails with every
    /// shape and rule error together.
    pub fn finish_with<T: Validate>(self, schema: T) -> Result<T, Vec<FieldError>> {
        let mut errors = self.errors;
        if let Err(rule_errors) = schema.validate() {
            errors.extend(flatten(&rule_errors));
        }
        if errors.is_empty() {
            Ok(schema)
        } else {
            Err(errors)
        }
    }

    /// Like `finish_with`, for when a required field is missing and only a
    /// partial (all-optional) view of the body can be checked.
    pub fn into_errors_with<T: Validate>(self, partial: T) -> Vec<FieldError> {
        self.finish_with(partial).err().unwrap_or_default()
    }
}

fn flatten(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| FieldError {
                field: field.clone(),
                code: e.code.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}
