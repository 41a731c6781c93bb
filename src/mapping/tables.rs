//! Mappings for Clients, Products and Sales.

use super::{ColumnMapping, ColumnType, EntityMapping, ForeignKey, IncludeDirection, OnDelete, RelationMapping};

/// Decimal places stored for product prices.
pub const PRICE_SCALE: u8 = 5;

pub static CLIENTS: EntityMapping = EntityMapping {
    name: "client",
    table: "Clients",
    id_column: "Id",
    columns: &[
        ColumnMapping {
            name: "Id",
            column_type: ColumnType::Identity,
            nullable: false,
            references: None,
        },
        ColumnMapping {
            name: "Name",
            column_type: ColumnType::Text,
            nullable: false,
            references: None,
        },
    ],
    relations: &[&CLIENT_SALES],
};

pub static PRODUCTS: EntityMapping = EntityMapping {
    name: "product",
    table: "Products",
    id_column: "Id",
    columns: &[
        ColumnMapping {
            name: "Id",
            column_type: ColumnType::Identity,
            nullable: false,
            references: None,
        },
        ColumnMapping {
            name: "Name",
            column_type: ColumnType::Text,
            nullable: false,
            references: None,
        },
        ColumnMapping {
            name: "Price",
            column_type: ColumnType::Numeric {
                precision: 19,
                scale: PRICE_SCALE,
            },
            nullable: false,
            references: None,
        },
    ],
    relations: &[],
};

pub static SALES: EntityMapping = EntityMapping {
    name: "sales",
    table: "Sales",
    id_column: "Id",
    columns: &[
        ColumnMapping {
            name: "Id",
            column_type: ColumnType::Identity,
            nullable: false,
            references: None,
        },
        // Owned by the client: removing a client removes its sales.
        ColumnMapping {
            name: "ClientId",
            column_type: ColumnType::Integer,
            nullable: false,
            references: Some(ForeignKey {
                table: "Clients",
                column: "Id",
                on_delete: OnDelete::Cascade,
            }),
        },
        ColumnMapping {
            name: "ProductId",
            column_type: ColumnType::Integer,
            nullable: false,
            references: Some(ForeignKey {
                table: "Products",
                column: "Id",
                on_delete: OnDelete::NoAction,
            }),
        },
    ],
    relations: &[&SALES_CLIENT, &SALES_PRODUCT],
};

pub static CLIENT_SALES: RelationMapping = RelationMapping {
    name: "Sales",
    direction: IncludeDirection::ToMany,
    related: sales,
    our_key: "Id",
    their_key: "ClientId",
};

pub static SALES_CLIENT: RelationMapping = RelationMapping {
    name: "Client",
    direction: IncludeDirection::ToOne,
    related: clients,
    our_key: "ClientId",
    their_key: "Id",
};

pub static SALES_PRODUCT: RelationMapping = RelationMapping {
    name: "Product",
    direction: IncludeDirection::ToOne,
    related: products,
    our_key: "ProductId",
    their_key: "Id",
};

/// All mappings in foreign key dependency order.
pub static ENTITY_MAPPINGS: [&EntityMapping; 3] = [&CLIENTS, &PRODUCTS, &SALES];

fn clients() -> &'static EntityMapping {
    &CLIENTS
}

fn products() -> &'static EntityMapping {
    &PRODUCTS
}

fn sales() -> &'static EntityMapping {
    &SALES
}
