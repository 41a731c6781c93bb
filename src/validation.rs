//! Request validation from static per-DTO field rules.

use crate::error::{AppError, FieldErrors};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
}

/// Rule for one body field, keyed by its wire name.
#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
}

impl FieldRule {
    pub const fn required(field: &'static str, kind: FieldKind) -> Self {
        FieldRule {
            field,
            kind,
            required: true,
            min_length: None,
            max_length: None,
        }
    }

    pub const fn max_length(mut self, max: u32) -> Self {
        self.max_length = Some(max);
        self
    }
}

/// Implemented by request DTOs that are checked before decoding.
pub trait Validated: DeserializeOwned {
    const RULES: &'static [FieldRule];
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate body against rules, collecting every violation.
    pub fn validate(body: &Map<String, Value>, rules: &[FieldRule]) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        for rule in rules {
            match body.get(rule.field) {
                Some(v) if !is_blank(v) => validate_field(rule, v, &mut errors),
                _ if rule.required => errors.add(rule.field, format!("{} is required", rule.field)),
                _ => {}
            }
        }
        errors.into_result()
    }

    /// Validate a JSON body and decode it into `T`.
    pub fn decode<T: Validated>(body: Value) -> Result<T, AppError> {
        let Value::Object(map) = body else {
            return Err(AppError::BadRequest("body must be a JSON object".into()));
        };
        Self::validate(&map, T::RULES)?;
        serde_json::from_value(Value::Object(map)).map_err(|e| AppError::BadRequest(e.to_string()))
    }
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn validate_field(rule: &FieldRule, v: &Value, errors: &mut FieldErrors) {
    let col = rule.field;
    match rule.kind {
        FieldKind::Text => {
            let Some(s) = v.as_str() else {
                errors.add(col, format!("{} must be a string", col));
                return;
            };
            let len = s.chars().count();
            if let Some(max) = rule.max_length {
                if len > max as usize {
                    errors.add(col, format!("{} must be at most {} characters", col, max));
                }
            }
            if let Some(min) = rule.min_length {
                if len < min as usize {
                    errors.add(col, format!("{} must be at least {} characters", col, min));
                }
            }
        }
        FieldKind::Integer => {
            if v.as_i64().and_then(|n| i32::try_from(n).ok()).is_none() {
                errors.add(col, format!("{} must be an integer", col));
            }
        }
        FieldKind::Decimal => {
            let ok = match v {
                Value::Number(n) => Decimal::from_str(&n.to_string())
                    .or_else(|_| Decimal::from_scientific(&n.to_string()))
                    .is_ok(),
                Value::String(s) => Decimal::from_str(s.trim()).is_ok(),
                _ => false,
            };
            if !ok {
                errors.add(col, format!("{} must be a number", col));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RULES: &[FieldRule] = &[
        FieldRule::required("name", FieldKind::Text).max_length(5),
        FieldRule::required("price", FieldKind::Decimal),
        FieldRule {
            field: "clientId",
            kind: FieldKind::Integer,
            required: false,
            min_length: None,
            max_length: None,
        },
    ];

    fn errors(body: Value) -> FieldErrors {
        let Value::Object(map) = body else { unreachable!() };
        match RequestValidator::validate(&map, RULES) {
            Err(AppError::Validation(fields)) => fields,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn missing_null_and_blank_are_required_violations() {
        let fields = errors(json!({"name": "  ", "price": null}));
        assert_eq!(fields.get("name"), Some(&["name is required".to_string()][..]));
        assert_eq!(fields.get("price"), Some(&["price is required".to_string()][..]));
        assert!(fields.get("clientId").is_none());
    }

    #[test]
    fn type_and_length_violations() {
        let fields = errors(json!({"name": "toolong", "price": "abc", "clientId": 1.5}));
        assert!(fields.get("name").is_some());
        assert!(fields.get("price").is_some());
        assert!(fields.get("clientId").is_some());
    }

    #[test]
    fn valid_body_passes() {
        let map = json!({"name": "P1", "price": 10.25, "clientId": 3});
        let Value::Object(map) = map else { unreachable!() };
        RequestValidator::validate(&map, RULES).unwrap();
    }
}
