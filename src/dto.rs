//! Wire-format objects and the projection rules between them and entities.

use crate::entity::{round_price, Client, Product, Sales};
use crate::validation::{FieldKind, FieldRule, Validated};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Client with its sales flattened to [`SalesDto`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientDto {
    pub id: i32,
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub sales: Vec<SalesDto>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Sale with client and product reduced to their identities.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesDto {
    pub id: i32,
    pub client_id: i32,
    pub product_id: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    #[schema(value_type = f64)]
    pub price: Decimal,
}

impl Validated for ClientDto {
    const RULES: &'static [FieldRule] = &[FieldRule::required("name", FieldKind::Text)];
}

impl Validated for ProductDto {
    const RULES: &'static [FieldRule] = &[
        FieldRule::required("name", FieldKind::Text),
        FieldRule::required("price", FieldKind::Decimal),
    ];
}

impl Validated for SalesDto {
    const RULES: &'static [FieldRule] = &[
        FieldRule::required("clientId", FieldKind::Integer),
        FieldRule::required("productId", FieldKind::Integer),
    ];
}

impl From<&Sales> for SalesDto {
    fn from(s: &Sales) -> Self {
        SalesDto {
            id: s.id,
            client_id: s.client_id,
            product_id: s.product_id,
        }
    }
}

impl From<&Client> for ClientDto {
    fn from(c: &Client) -> Self {
        ClientDto {
            id: c.id,
            name: c.name.clone(),
            sales: c
                .sales
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(SalesDto::from)
                .collect(),
        }
    }
}

impl From<&Product> for ProductDto {
    fn from(p: &Product) -> Self {
        ProductDto {
            id: p.id,
            name: p.name.clone(),
            price: p.price,
        }
    }
}

/// Nested sales are not carried over; sales are created on their own.
impl From<ClientDto> for Client {
    fn from(dto: ClientDto) -> Self {
        Client {
            id: dto.id,
            name: dto.name,
            sales: None,
        }
    }
}

impl From<ProductDto> for Product {
    fn from(dto: ProductDto) -> Self {
        Product {
            id: dto.id,
            name: dto.name,
            price: round_price(dto.price),
        }
    }
}

impl From<SalesDto> for Sales {
    fn from(dto: SalesDto) -> Self {
        Sales {
            id: dto.id,
            ..Sales::new(dto.client_id, dto.product_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_with_sales() -> Client {
        Client {
            id: 1,
            name: "Client1".into(),
            sales: Some(vec![
                Sales {
                    id: 1,
                    product: Some(Product {
                        id: 1,
                        name: "Product1".into(),
                        price: Decimal::new(10, 0),
                    }),
                    ..Sales::new(1, 1)
                },
                Sales { id: 2, ..Sales::new(1, 2) },
            ]),
        }
    }

    #[test]
    fn client_projection_flattens_sales() {
        let dto = ClientDto::from(&client_with_sales());
        assert_eq!(dto.id, 1);
        assert_eq!(dto.name, "Client1");
        assert_eq!(
            dto.sales,
            vec![
                SalesDto { id: 1, client_id: 1, product_id: 1 },
                SalesDto { id: 2, client_id: 1, product_id: 2 },
            ]
        );
    }

    #[test]
    fn unloaded_sales_project_to_empty_list() {
        let dto = ClientDto::from(&Client::new("Lazy"));
        assert!(dto.sales.is_empty());
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({"id": 0, "name": "Lazy", "sales": []})
        );
    }

    #[test]
    fn product_price_is_a_json_number() {
        let dto = ProductDto::from(&Product::new("P1", Decimal::new(1050, 2)));
        assert_eq!(serde_json::to_value(&dto).unwrap(), json!({"id": 0, "name": "P1", "price": 10.5}));
        let back: ProductDto = serde_json::from_value(json!({"name": "P1", "price": "10.50"})).unwrap();
        assert_eq!(Product::from(back).price, Decimal::new(1050, 2));
        let precise: ProductDto = serde_json::from_value(json!({"name": "P1", "price": "1.123456"})).unwrap();
        assert_eq!(Product::from(precise).price, Decimal::new(112346, 5));
    }

    #[test]
    fn reverse_mapping_drops_nested_sales() {
        let dto: ClientDto = serde_json::from_value(json!({
            "name": "Client2",
            "sales": [{"id": 9, "clientId": 4, "productId": 5}]
        }))
        .unwrap();
        let client = Client::from(dto);
        assert_eq!(client, Client::new("Client2"));
        let dto: ClientDto = serde_json::from_value(json!({"name": "Client2", "sales": null})).unwrap();
        assert!(dto.sales.is_empty());
        let sale = Sales::from(SalesDto { id: 3, client_id: 4, product_id: 5 });
        assert_eq!((sale.id, sale.client_id, sale.product_id), (3, 4, 5));
    }
}
