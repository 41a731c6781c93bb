use super::{decode_many, Entity, JsonRow, Sales};
use crate::error::RepositoryError;
use crate::mapping::{EntityMapping, Relation, RelationMapping, CLIENTS, CLIENT_SALES};
use crate::sql::BindValue;
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::Row;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i32,
    pub name: String,
    /// `None` until eagerly loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales: Option<Vec<Sales>>,
}

impl Client {
    pub fn new(name: impl Into<String>) -> Self {
        Client {
            id: 0,
            name: name.into(),
            sales: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientRelation {
    Sales,
}

impl Relation for ClientRelation {
    fn mapping(self) -> &'static RelationMapping {
        match self {
            ClientRelation::Sales => &CLIENT_SALES,
        }
    }
}

impl Entity for Client {
    type Relation = ClientRelation;

    fn mapping() -> &'static EntityMapping {
        &CLIENTS
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn values(&self) -> Vec<BindValue> {
        vec![BindValue::Text(self.name.clone())]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Client {
            id: row.try_get("Id")?,
            name: row.try_get("Name")?,
            sales: None,
        })
    }

    fn from_json(row: &JsonRow<'_>) -> Result<Self, RepositoryError> {
        Ok(Client {
            id: row.int("Id")?,
            name: row.text("Name")?,
            sales: None,
        })
    }

    fn attach(&mut self, relation: ClientRelation, loaded: Value) -> Result<(), RepositoryError> {
        match relation {
            ClientRelation::Sales => self.sales = Some(decode_many(loaded)?),
        }
        Ok(())
    }
}
