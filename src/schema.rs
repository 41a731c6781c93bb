//! Startup schema synchronisation: bring tables, columns and foreign keys in line with the mappings.
//! Not a migration system; nothing is ever dropped or altered in place.

use crate::error::{AppError, ConfigError};
use crate::mapping::{validate, ColumnMapping, EntityMapping};
use crate::sql::quoted;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

fn column_def(c: &ColumnMapping) -> String {
    let mut def = format!("{} {}", quoted(c.name), c.column_type.ddl());
    if !c.nullable {
        def.push_str(" NOT NULL");
    }
    def
}

/// CREATE TABLE IF NOT EXISTS with every column and the identity primary key.
pub fn create_table_sql(entity: &EntityMapping) -> String {
    let mut defs: Vec<String> = entity.columns.iter().map(column_def).collect();
    defs.push(format!("PRIMARY KEY ({})", quoted(entity.id_column)));
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quoted(entity.table),
        defs.join(",\n  ")
    )
}

/// Constraint name for the foreign key held by `column`.
pub fn foreign_key_name(entity: &EntityMapping, column: &str) -> String {
    format!("FK_{}_{}", entity.table, column)
}

/// Apply mappings in order: tables, then missing columns, then missing foreign keys.
/// Mappings must be listed so that referenced tables come first.
///
/// A column or foreign key that cannot be added (e.g. existing orphan rows in `Sales`) is
/// logged at `warn` and skipped. Without the foreign keys, client deletes no longer cascade
/// and sales referencing missing rows are accepted; clean the data and restart to add them.
pub async fn sync_schema(pool: &PgPool, mappings: &[&EntityMapping]) -> Result<(), AppError> {
    validate(mappings)?;

    for m in mappings {
        sqlx::query(&create_table_sql(m)).execute(pool).await?;
        for c in m.data_columns() {
            let sql = format!(
                "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {}",
                quoted(m.table),
                column_def(c)
            );
            if let Err(e) = sqlx::query(&sql).execute(pool).await {
                tracing::warn!(table = m.table, column = c.name, error = %e, "could not add column");
            }
        }
        tracing::info!(table = m.table, "table in sync");
    }

    for m in mappings {
        for c in m.columns {
            let Some(fk) = c.references else { continue };
            let name = foreign_key_name(m, c.name);
            let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_constraint WHERE conname = $1)")
                .bind(&name)
                .fetch_one(pool)
                .await?;
            if exists.0 {
                continue;
            }
            let sql = format!(
                "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {}",
                quoted(m.table),
                quoted(&name),
                quoted(c.name),
                quoted(fk.table),
                quoted(fk.column),
                fk.on_delete.sql()
            );
            match sqlx::query(&sql).execute(pool).await {
                Ok(_) => tracing::info!(constraint = %name, "foreign key added"),
                Err(e) => tracing::warn!(constraint = %name, error = %e, "could not add foreign key"),
            }
        }
    }

    Ok(())
}

/// Create the target database when it does not exist (connects to the `postgres` maintenance db).
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| ConfigError::Setting {
            key: "DATABASE_URL",
            message: e.to_string(),
        })?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split a connection string into (maintenance url, database name).
fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let (base, path_and_query) = url.rsplit_once('/').ok_or_else(|| ConfigError::Setting {
        key: "DATABASE_URL",
        message: "no database path".into(),
    })?;
    if base.ends_with('/') {
        return Ok((url.to_string(), String::new()));
    }
    let (db_name, query) = match path_and_query.split_once('?') {
        Some((name, q)) => (name.trim(), Some(q)),
        None => (path_and_query.trim(), None),
    };
    let admin_url = match query {
        Some(q) => format!("{}/postgres?{}", base, q),
        None => format!("{}/postgres", base),
    };
    Ok((admin_url, db_name.to_string()))
}
