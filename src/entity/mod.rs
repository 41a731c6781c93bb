//! Entity records and the identity capability the repository is generic over.

mod client;
mod product;
mod sales;

pub use client::{Client, ClientRelation};
pub use product::{round_price, Product};
pub use sales::{Sales, SalesRelation};

use crate::error::RepositoryError;
use crate::mapping::{EntityMapping, Relation};
use crate::sql::BindValue;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use std::str::FromStr;

/// A mapped record with an integer identity generated by storage.
pub trait Entity: Clone + Send + Sync + Unpin + 'static {
    /// Navigable relations that can be eagerly loaded.
    type Relation: Relation;

    fn mapping() -> &'static EntityMapping;

    fn id(&self) -> i32;

    fn set_id(&mut self, id: i32);

    /// Values for the mapping's data columns, in mapping order.
    fn values(&self) -> Vec<BindValue>;

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;

    /// Decode a row embedded as JSON by an include subquery.
    fn from_json(row: &JsonRow<'_>) -> Result<Self, RepositoryError>;

    /// Attach an eagerly loaded relation (JSON array for to_many, object or null for to_one).
    fn attach(&mut self, relation: Self::Relation, loaded: Value) -> Result<(), RepositoryError>;
}

/// Column access over a JSON object produced by `row_to_json`.
pub struct JsonRow<'a> {
    table: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> JsonRow<'a> {
    pub fn new(table: &'static str, map: &'a Map<String, Value>) -> Self {
        JsonRow { table, map }
    }

    fn field(&self, col: &str) -> Result<&'a Value, RepositoryError> {
        self.map
            .get(col)
            .filter(|v| !v.is_null())
            .ok_or_else(|| self.error(format!("missing column {}", col)))
    }

    pub fn int(&self, col: &str) -> Result<i32, RepositoryError> {
        self.field(col)?
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| self.error(format!("column {} is not an integer", col)))
    }

    pub fn text(&self, col: &str) -> Result<String, RepositoryError> {
        self.field(col)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.error(format!("column {} is not text", col)))
    }

    pub fn decimal(&self, col: &str) -> Result<Decimal, RepositoryError> {
        let parsed = match self.field(col)? {
            Value::String(s) => Decimal::from_str(s).ok(),
            Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
            _ => None,
        };
        parsed.ok_or_else(|| self.error(format!("column {} is not numeric", col)))
    }

    fn error(&self, message: String) -> RepositoryError {
        RepositoryError::Decode {
            table: self.table,
            message,
        }
    }
}

fn decode_error(table: &'static str, message: &str) -> RepositoryError {
    RepositoryError::Decode {
        table,
        message: message.to_string(),
    }
}

/// Decode a to_many include (JSON array of rows).
pub(crate) fn decode_many<E: Entity>(loaded: Value) -> Result<Vec<E>, RepositoryError> {
    let table = E::mapping().table;
    match loaded {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                let map = item.as_object().ok_or_else(|| decode_error(table, "include item is not an object"))?;
                E::from_json(&JsonRow::new(table, map))
            })
            .collect(),
        _ => Err(decode_error(table, "to_many include is not an array")),
    }
}

/// Decode a to_one include (JSON object, or null when nothing matched).
pub(crate) fn decode_one<E: Entity>(loaded: Value) -> Result<Option<E>, RepositoryError> {
    let table = E::mapping().table;
    match loaded {
        Value::Null => Ok(None),
        Value::Object(map) => E::from_json(&JsonRow::new(table, &map)).map(Some),
        _ => Err(decode_error(table, "to_one include is not an object")),
    }
}
