//! Partial updates: JSON body → allow-listed, typed assignments.

use crate::error::AppError;
use crate::service::{RequestValidator, ValidationRule};
use crate::sql::{Assignment, BindValue, UpdatableField};
use serde_json::{Map, Value};

/// A resource field that clients may PATCH.
pub trait PatchField: UpdatableField + Sized + 'static {
    /// JSON keys accepted in a PATCH body.
    const ALLOWED: &'static [&'static str];

    fn from_key(key: &str) -> Option<Self>;

    /// Type check and validate a non-null JSON value for this field.
    fn bind(self, value: &Value) -> Result<BindValue, AppError>;
}

/// The accepted, non-null subset of a PATCH body. Never empty.
#[derive(Debug)]
pub struct Patch<F> {
    pub assignments: Vec<Assignment<F>>,
}

impl<F: PatchField> Patch<F> {
    pub fn from_json(body: Value) -> Result<Self, AppError> {
        let Value::Object(map) = body else {
            return Err(AppError::BadRequest("body must be a JSON object".into()));
        };
        let mut assignments = Vec::with_capacity(map.len());
        for (key, value) in map {
            let field = F::from_key(&key).ok_or_else(|| {
                AppError::BadRequest(format!(
                    "unknown field '{}' (allowed: {})",
                    key,
                    F::ALLOWED.join(", ")
                ))
            })?;
            if value.is_null() {
                continue;
            }
            let value = field.bind(&value)?;
            assignments.push(Assignment { field, value });
        }
        if assignments.is_empty() {
            return Err(AppError::BadRequest("no updatable fields supplied".into()));
        }
        Ok(Patch { assignments })
    }

    /// Accepted pairs plus `id`, as sent back to the client.
    pub fn echo(&self, id: Value) -> Map<String, Value> {
        let mut out = Map::new();
        for a in &self.assignments {
            out.insert(a.field.column().to_string(), a.value.to_json());
        }
        out.insert("id".into(), id);
        out
    }
}

pub(crate) fn text_value(field: &str, value: &Value, rule: &ValidationRule) -> Result<BindValue, AppError> {
    let s = value
        .as_str()
        .ok_or_else(|| AppError::Validation(format!("{} must be a string", field)))?;
    RequestValidator::validate(field, s, rule)?;
    Ok(BindValue::text(s))
}

pub(crate) fn int4_value(field: &str, value: &Value) -> Result<BindValue, AppError> {
    let n = value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| AppError::Validation(format!("{} must be an integer", field)))?;
    Ok(BindValue::Int4(Some(n)))
}
