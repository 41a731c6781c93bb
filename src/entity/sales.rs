use super::{decode_one, Client, Entity, JsonRow, Product};
use crate::error::RepositoryError;
use crate::mapping::{EntityMapping, Relation, RelationMapping, SALES, SALES_CLIENT, SALES_PRODUCT};
use crate::sql::BindValue;
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::Row;

/// One sale: a required client and a required product.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sales {
    pub id: i32,
    pub client_id: i32,
    pub product_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<Box<Client>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

impl Sales {
    pub fn new(client_id: i32, product_id: i32) -> Self {
        Sales {
            id: 0,
            client_id,
            product_id,
            client: None,
            product: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SalesRelation {
    Client,
    Product,
}

impl Relation for SalesRelation {
    fn mapping(self) -> &'static RelationMapping {
        match self {
            SalesRelation::Client => &SALES_CLIENT,
            SalesRelation::Product => &SALES_PRODUCT,
        }
    }
}

impl Entity for Sales {
    type Relation = SalesRelation;

    fn mapping() -> &'static EntityMapping {
        &SALES
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn values(&self) -> Vec<BindValue> {
        vec![BindValue::Int(self.client_id), BindValue::Int(self.product_id)]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Sales {
            id: row.try_get("Id")?,
            client_id: row.try_get("ClientId")?,
            product_id: row.try_get("ProductId")?,
            client: None,
            product: None,
        })
    }

    fn from_json(row: &JsonRow<'_>) -> Result<Self, RepositoryError> {
        Ok(Sales {
            id: row.int("Id")?,
            client_id: row.int("ClientId")?,
            product_id: row.int("ProductId")?,
            client: None,
            product: None,
        })
    }

    fn attach(&mut self, relation: SalesRelation, loaded: Value) -> Result<(), RepositoryError> {
        match relation {
            SalesRelation::Client => self.client = decode_one::<Client>(loaded)?.map(Box::new),
            SalesRelation::Product => self.product = decode_one(loaded)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::decode_many;
    use rust_decimal::Decimal;
    use serde_json::json;

    #[test]
    fn attaches_to_one_includes() {
        let mut sale = Sales::new(1, 2);
        sale.attach(SalesRelation::Client, json!({"Id": 1, "Name": "Client1"})).unwrap();
        sale.attach(SalesRelation::Product, json!({"Id": 2, "Name": "P1", "Price": "10.50000"}))
            .unwrap();
        assert_eq!(sale.client.as_deref().map(|c| c.name.as_str()), Some("Client1"));
        assert_eq!(sale.product.map(|p| p.price), Some(Decimal::new(105, 1)));
    }

    #[test]
    fn client_sales_include_decodes_array() {
        let mut client = Client::new("Client1");
        client
            .attach(
                crate::entity::ClientRelation::Sales,
                json!([{"Id": 5, "ClientId": 1, "ProductId": 2}]),
            )
            .unwrap();
        assert_eq!(client.sales, Some(vec![Sales { id: 5, ..Sales::new(1, 2) }]));
    }

    #[test]
    fn malformed_include_is_a_decode_error() {
        let err = decode_many::<Sales>(json!([{"Id": 5, "ClientId": "x"}])).unwrap_err();
        assert!(matches!(err, RepositoryError::Decode { table: "Sales", .. }));
        let err = decode_many::<Sales>(json!({"Id": 5})).unwrap_err();
        assert!(matches!(err, RepositoryError::Decode { .. }));
    }

    #[test]
    fn unloaded_references_are_not_serialized() {
        let v = serde_json::to_value(Sales { id: 3, ..Sales::new(1, 2) }).unwrap();
        assert_eq!(v, json!({"id": 3, "clientId": 1, "productId": 2}));
    }
}
