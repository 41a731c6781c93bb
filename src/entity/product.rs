use super::{Entity, JsonRow};
use crate::error::RepositoryError;
use crate::mapping::{EntityMapping, NoRelation, PRICE_SCALE, PRODUCTS};
use crate::sql::BindValue;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::Row;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Product {
            id: 0,
            name: name.into(),
            price: round_price(price),
        }
    }
}

/// Round to the stored scale the way NUMERIC does (half away from zero).
pub fn round_price(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(PRICE_SCALE as u32, RoundingStrategy::MidpointAwayFromZero)
}

impl Entity for Product {
    type Relation = NoRelation;

    fn mapping() -> &'static EntityMapping {
        &PRODUCTS
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    fn values(&self) -> Vec<BindValue> {
        vec![BindValue::Text(self.name.clone()), BindValue::Decimal(self.price)]
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Product {
            id: row.try_get("Id")?,
            name: row.try_get("Name")?,
            price: row.try_get("Price")?,
        })
    }

    fn from_json(row: &JsonRow<'_>) -> Result<Self, RepositoryError> {
        Ok(Product {
            id: row.int("Id")?,
            name: row.text("Name")?,
            price: row.decimal("Price")?,
        })
    }

    fn attach(&mut self, relation: NoRelation, _loaded: Value) -> Result<(), RepositoryError> {
        match relation {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_round_half_away_from_zero_to_stored_scale() {
        assert_eq!(round_price(Decimal::new(1123456, 6)), Decimal::new(112346, 5));
        assert_eq!(round_price(Decimal::new(1123445, 6)), Decimal::new(112345, 5));
        assert_eq!(round_price(Decimal::new(-1123445, 6)), Decimal::new(-112345, 5));
        assert_eq!(Product::new("P1", Decimal::new(1050, 2)).price, Decimal::new(1050, 2));
    }
}
