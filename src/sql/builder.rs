//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from a static entity mapping.

use super::params::BindValue;
use crate::mapping::{ColumnType, EntityMapping, IncludeDirection, RelationMapping};

const MAIN_ALIAS: &str = "main";

/// Quote identifier for PostgreSQL (safe: only from static mappings).
pub(crate) fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a value and return its `$n::type` placeholder.
    fn push_param(&mut self, v: BindValue, column_type: ColumnType) -> String {
        self.params.push(v);
        format!("${}::{}", self.params.len(), column_type.pg_type())
    }
}

fn id_type(entity: &EntityMapping) -> ColumnType {
    entity
        .column(entity.id_column)
        .map(|c| c.column_type)
        .unwrap_or(ColumnType::Identity)
}

/// SELECT list for top-level rows, optionally qualified by a table alias.
fn select_column_list(entity: &EntityMapping, alias: Option<&str>) -> String {
    entity
        .columns
        .iter()
        .map(|c| match alias {
            Some(a) => format!("{}.{} AS {}", a, quoted(c.name), quoted(c.name)),
            None => quoted(c.name),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT list inside include subqueries: numeric as text so precision survives row_to_json.
fn json_column_list(entity: &EntityMapping) -> String {
    entity
        .columns
        .iter()
        .map(|c| {
            let q = quoted(c.name);
            match c.column_type {
                ColumnType::Numeric { .. } => format!("{}::text AS {}", q, q),
                _ => q,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT by identity. Caller binds nothing else; the id is the sole param.
pub fn select_by_id(entity: &EntityMapping, id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(BindValue::Int(id), id_type(entity));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        select_column_list(entity, None),
        quoted(entity.table),
        quoted(entity.id_column),
        ph
    );
    q
}

/// SELECT all rows ORDER BY identity.
pub fn select_all(entity: &EntityMapping) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(entity, None),
        quoted(entity.table),
        quoted(entity.id_column)
    );
    q
}

/// SELECT with includes in a single statement: main table aliased as "main", each include as a
/// correlated scalar subquery (json_agg for to_many, row_to_json for to_one) aliased by relation name.
/// With `id` set the rows are filtered to that identity.
pub fn select_with_includes(entity: &EntityMapping, includes: &[&RelationMapping], id: Option<i32>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = quoted(entity.table);

    let mut select_parts = vec![select_column_list(entity, Some(MAIN_ALIAS))];
    for inc in includes {
        let related = (inc.related)();
        let sub_from = format!(
            "{} WHERE {} = {}.{}",
            quoted(related.table),
            quoted(inc.their_key),
            MAIN_ALIAS,
            quoted(inc.our_key)
        );
        let rel_cols = json_column_list(related);
        let subquery = match inc.direction {
            IncludeDirection::ToOne => format!(
                "(SELECT row_to_json(sub) FROM (SELECT {} FROM {}) sub)",
                rel_cols, sub_from
            ),
            IncludeDirection::ToMany => format!(
                "(SELECT COALESCE(json_agg(row_to_json(sub) ORDER BY sub.{}), '[]'::json) FROM (SELECT {} FROM {}) sub)",
                quoted(related.id_column),
                rel_cols,
                sub_from
            ),
        };
        select_parts.push(format!("{} AS {}", subquery, quoted(inc.name)));
    }

    let where_clause = match id {
        Some(id) => {
            let ph = q.push_param(BindValue::Int(id), id_type(entity));
            format!(" WHERE {}.{} = {}", MAIN_ALIAS, quoted(entity.id_column), ph)
        }
        None => String::new(),
    };

    q.sql = format!(
        "SELECT {} FROM {} {}{} ORDER BY {}.{}",
        select_parts.join(", "),
        table,
        MAIN_ALIAS,
        where_clause,
        MAIN_ALIAS,
        quoted(entity.id_column)
    );
    q
}

/// INSERT all data columns; identity is generated and returned.
/// `values` are in `data_columns` order.
pub fn insert(entity: &EntityMapping, values: Vec<BindValue>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (c, v) in entity.data_columns().zip(values) {
        cols.push(quoted(c.name));
        placeholders.push(q.push_param(v, c.column_type));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(entity.table),
        cols.join(", "),
        placeholders.join(", "),
        quoted(entity.id_column)
    );
    q
}

/// UPDATE by identity: SET every data column.
pub fn update(entity: &EntityMapping, id: i32, values: Vec<BindValue>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for (c, v) in entity.data_columns().zip(values) {
        let rhs = q.push_param(v, c.column_type);
        sets.push(format!("{} = {}", quoted(c.name), rhs));
    }
    let id_ph = q.push_param(BindValue::Int(id), id_type(entity));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        quoted(entity.table),
        sets.join(", "),
        quoted(entity.id_column),
        id_ph
    );
    q
}

/// DELETE by identity.
pub fn delete(entity: &EntityMapping, id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(BindValue::Int(id), id_type(entity));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        quoted(entity.table),
        quoted(entity.id_column),
        ph
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{CLIENTS, CLIENT_SALES, PRODUCTS, SALES, SALES_CLIENT, SALES_PRODUCT};
    use rust_decimal::Decimal;

    #[test]
    fn select_by_id_binds_identity() {
        let q = select_by_id(&CLIENTS, 7);
        assert_eq!(q.sql, r#"SELECT "Id", "Name" FROM "Clients" WHERE "Id" = $1::integer"#);
        assert_eq!(q.params, vec![BindValue::Int(7)]);
    }

    #[test]
    fn select_all_orders_by_identity() {
        let q = select_all(&PRODUCTS);
        assert_eq!(q.sql, r#"SELECT "Id", "Name", "Price" FROM "Products" ORDER BY "Id""#);
        assert!(q.params.is_empty());
    }

    #[test]
    fn to_many_include_is_a_correlated_json_agg() {
        let q = select_with_includes(&CLIENTS, &[&CLIENT_SALES], None);
        assert!(q.sql.starts_with(r#"SELECT main."Id" AS "Id", main."Name" AS "Name", (SELECT COALESCE(json_agg"#));
        assert!(q.sql.contains(r#"FROM "Sales" WHERE "ClientId" = main."Id") sub) AS "Sales""#));
        assert!(q.sql.ends_with(r#"FROM "Clients" main ORDER BY main."Id""#));
        assert!(q.params.is_empty());
    }

    #[test]
    fn to_one_includes_cast_numeric_to_text() {
        let q = select_with_includes(&SALES, &[&SALES_CLIENT, &SALES_PRODUCT], Some(3));
        assert!(q.sql.contains(r#"(SELECT row_to_json(sub) FROM (SELECT "Id", "Name" FROM "Clients" WHERE "Id" = main."ClientId") sub) AS "Client""#));
        assert!(q.sql.contains(r#""Price"::text AS "Price""#));
        assert!(q.sql.contains(r#" WHERE main."Id" = $1::integer ORDER BY"#));
        assert_eq!(q.params, vec![BindValue::Int(3)]);
    }

    #[test]
    fn insert_skips_identity_and_returns_it() {
        let q = insert(&PRODUCTS, vec![BindValue::from("P1"), BindValue::from(Decimal::new(10, 0))]);
        assert_eq!(
            q.sql,
            r#"INSERT INTO "Products" ("Name", "Price") VALUES ($1::text, $2::numeric) RETURNING "Id""#
        );
        assert_eq!(q.params.len(), 2);
    }

    #[test]
    fn update_sets_data_columns_then_binds_id() {
        let q = update(&SALES, 4, vec![BindValue::Int(1), BindValue::Int(2)]);
        assert_eq!(
            q.sql,
            r#"UPDATE "Sales" SET "ClientId" = $1::integer, "ProductId" = $2::integer WHERE "Id" = $3::integer"#
        );
        assert_eq!(q.params.last(), Some(&BindValue::Int(4)));
    }

    #[test]
    fn delete_by_identity() {
        let q = delete(&CLIENTS, 9);
        assert_eq!(q.sql, r#"DELETE FROM "Clients" WHERE "Id" = $1::integer"#);
    }
}
