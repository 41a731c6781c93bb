//! Repository execution against PostgreSQL.

use super::Repository;
use crate::entity::Entity;
use crate::error::RepositoryError;
use crate::mapping::{Relation, RelationMapping};
use crate::sql::{delete, insert, select_all, select_by_id, select_with_includes, update, QueryBuf};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgConnection, PgPool, Postgres, Row};
use std::marker::PhantomData;

pub struct PgRepository<T> {
    pool: PgPool,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for PgRepository<T> {
    fn clone(&self) -> Self {
        PgRepository {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> PgRepository<T> {
    pub fn new(pool: PgPool) -> Self {
        PgRepository {
            pool,
            _entity: PhantomData,
        }
    }

    async fn fetch_all(&self, q: &QueryBuf) -> Result<Vec<PgRow>, RepositoryError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut conn = self.pool.acquire().await?;
        Ok(bind(q).fetch_all(&mut *conn).await?)
    }

    /// Run one include-query and decode rows with their relations attached.
    async fn fetch_with_includes(&self, includes: &[T::Relation], id: Option<i32>) -> Result<Vec<T>, RepositoryError> {
        let includes = dedup(includes);
        let mappings: Vec<&RelationMapping> = includes.iter().map(|r| r.mapping()).collect();
        let q = select_with_includes(T::mapping(), &mappings, id);
        let rows = self.fetch_all(&q).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut entity = T::from_row(row)?;
            for rel in &includes {
                let loaded: Option<Value> = row.try_get(rel.mapping().name)?;
                entity.attach(*rel, loaded.unwrap_or(Value::Null))?;
            }
            out.push(entity);
        }
        Ok(out)
    }

    /// Execute one write inside its own transaction; zero affected rows aborts it.
    async fn execute_in_tx(&self, q: &QueryBuf, id: i32) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let affected = execute_tx(&mut tx, q).await?;
        if affected == 0 {
            return Err(RepositoryError::StaleEntity {
                table: T::mapping().table,
                id,
            });
        }
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for PgRepository<T> {
    async fn get(&self, id: i32) -> Result<Option<T>, RepositoryError> {
        let q = select_by_id(T::mapping(), id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut conn = self.pool.acquire().await?;
        let row = bind(&q).fetch_optional(&mut *conn).await?;
        Ok(row.map(|r| T::from_row(&r)).transpose()?)
    }

    async fn get_all(&self) -> Result<Vec<T>, RepositoryError> {
        let rows = self.fetch_all(&select_all(T::mapping())).await?;
        Ok(rows.iter().map(T::from_row).collect::<Result<_, _>>()?)
    }

    async fn get_all_with_eager_loading(&self, includes: &[T::Relation]) -> Result<Vec<T>, RepositoryError> {
        self.fetch_with_includes(includes, None).await
    }

    async fn get_by_id_with_eager_loading(
        &self,
        id: i32,
        includes: &[T::Relation],
    ) -> Result<Option<T>, RepositoryError> {
        let found = self.fetch_with_includes(includes, Some(id)).await?;
        at_most_one(T::mapping().table, id, found)
    }

    async fn add(&self, entity: &mut T) -> Result<(), RepositoryError> {
        let q = insert(T::mapping(), entity.values());
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let mut tx = self.pool.begin().await?;
        let row = bind(&q).fetch_one(&mut *tx).await?;
        let id: i32 = row.try_get(T::mapping().id_column)?;
        tx.commit().await?;
        entity.set_id(id);
        Ok(())
    }

    async fn update(&self, entity: &T) -> Result<(), RepositoryError> {
        let q = update(T::mapping(), entity.id(), entity.values());
        self.execute_in_tx(&q, entity.id()).await
    }

    async fn delete(&self, entity: &T) -> Result<(), RepositoryError> {
        let q = delete(T::mapping(), entity.id());
        self.execute_in_tx(&q, entity.id()).await
    }
}

fn bind(q: &QueryBuf) -> Query<'_, Postgres, PgArguments> {
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query
}

async fn execute_tx(tx: &mut PgConnection, q: &QueryBuf) -> Result<u64, RepositoryError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
    let result = bind(q).execute(&mut *tx).await?;
    Ok(result.rows_affected())
}

/// The single row matched by an identity, `None` for no row, `NonUniqueResult` for several.
fn at_most_one<R>(table: &'static str, id: i32, mut rows: Vec<R>) -> Result<Option<R>, RepositoryError> {
    if rows.len() > 1 {
        return Err(RepositoryError::NonUniqueResult {
            table,
            id,
            count: rows.len(),
        });
    }
    Ok(rows.pop())
}

/// Keep the first occurrence of each relation; a repeated include would duplicate its column alias.
fn dedup<R: Relation>(includes: &[R]) -> Vec<R> {
    let mut out: Vec<R> = Vec::with_capacity(includes.len());
    for rel in includes {
        if !out.iter().any(|r| r.mapping().name == rel.mapping().name) {
            out.push(*rel);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ClientRelation, SalesRelation};

    #[test]
    fn identity_lookup_allows_at_most_one_row() {
        assert_eq!(at_most_one::<i32>("Clients", 1, vec![]).unwrap(), None);
        assert_eq!(at_most_one("Clients", 1, vec![10]).unwrap(), Some(10));
        let err = at_most_one("Clients", 1, vec![10, 11]).unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::NonUniqueResult { table: "Clients", id: 1, count: 2 }
        ));
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let rels = dedup(&[SalesRelation::Product, SalesRelation::Client, SalesRelation::Product]);
        assert_eq!(rels, vec![SalesRelation::Product, SalesRelation::Client]);
        assert_eq!(dedup(&[ClientRelation::Sales, ClientRelation::Sales]).len(), 1);
    }
}
