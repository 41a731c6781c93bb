//! In-memory repositories and request helpers for router tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sales_api::entity::{Client, ClientRelation, Entity, Product, Sales, SalesRelation};
use sales_api::{app, AppState, Repository, RepositoryError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

#[derive(Default)]
pub struct Db {
    clients: BTreeMap<i32, Client>,
    products: BTreeMap<i32, Product>,
    sales: BTreeMap<i32, Sales>,
    next_id: i32,
}

/// Per-entity access to the in-memory tables.
pub trait Stored: Entity {
    fn table(db: &mut Db) -> &mut BTreeMap<i32, Self>;

    fn load(&mut self, _db: &Db, _includes: &[Self::Relation]) {}

    fn on_delete(_db: &mut Db, _id: i32) {}
}

impl Stored for Client {
    fn table(db: &mut Db) -> &mut BTreeMap<i32, Self> {
        &mut db.clients
    }

    fn load(&mut self, db: &Db, includes: &[ClientRelation]) {
        if includes.contains(&ClientRelation::Sales) {
            let id = self.id;
            self.sales = Some(db.sales.values().filter(|s| s.client_id == id).cloned().collect());
        }
    }

    fn on_delete(db: &mut Db, id: i32) {
        db.sales.retain(|_, s| s.client_id != id);
    }
}

impl Stored for Product {
    fn table(db: &mut Db) -> &mut BTreeMap<i32, Self> {
        &mut db.products
    }
}

impl Stored for Sales {
    fn table(db: &mut Db) -> &mut BTreeMap<i32, Self> {
        &mut db.sales
    }

    fn load(&mut self, db: &Db, includes: &[SalesRelation]) {
        if includes.contains(&SalesRelation::Client) {
            self.client = db.clients.get(&self.client_id).cloned().map(Box::new);
        }
        if includes.contains(&SalesRelation::Product) {
            self.product = db.products.get(&self.product_id).cloned();
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryRepository {
    db: Arc<Mutex<Db>>,
}

impl MemoryRepository {
    pub fn seed<T: Stored>(&self, mut entity: T) -> T {
        let mut db = self.db.lock().unwrap();
        db.next_id += 1;
        entity.set_id(db.next_id);
        T::table(&mut db).insert(entity.id(), entity.clone());
        entity
    }

    pub fn count<T: Stored>(&self) -> usize {
        T::table(&mut self.db.lock().unwrap()).len()
    }

    pub fn find<T: Stored>(&self, id: i32) -> Option<T> {
        T::table(&mut self.db.lock().unwrap()).get(&id).cloned()
    }
}

fn stale<T: Entity>(id: i32) -> RepositoryError {
    RepositoryError::StaleEntity {
        table: T::mapping().table,
        id,
    }
}

#[async_trait]
impl<T: Stored> Repository<T> for MemoryRepository {
    async fn get(&self, id: i32) -> Result<Option<T>, RepositoryError> {
        Ok(self.find(id))
    }

    async fn get_all(&self) -> Result<Vec<T>, RepositoryError> {
        Ok(T::table(&mut self.db.lock().unwrap()).values().cloned().collect())
    }

    async fn get_all_with_eager_loading(&self, includes: &[T::Relation]) -> Result<Vec<T>, RepositoryError> {
        let mut db = self.db.lock().unwrap();
        let mut rows: Vec<T> = T::table(&mut db).values().cloned().collect();
        for row in &mut rows {
            row.load(&db, includes);
        }
        Ok(rows)
    }

    async fn get_by_id_with_eager_loading(
        &self,
        id: i32,
        includes: &[T::Relation],
    ) -> Result<Option<T>, RepositoryError> {
        let mut db = self.db.lock().unwrap();
        let mut row = T::table(&mut db).get(&id).cloned();
        if let Some(row) = row.as_mut() {
            row.load(&db, includes);
        }
        Ok(row)
    }

    async fn add(&self, entity: &mut T) -> Result<(), RepositoryError> {
        *entity = self.seed(entity.clone());
        Ok(())
    }

    async fn update(&self, entity: &T) -> Result<(), RepositoryError> {
        let mut db = self.db.lock().unwrap();
        match T::table(&mut db).get_mut(&entity.id()) {
            Some(row) => {
                *row = entity.clone();
                Ok(())
            }
            None => Err(stale::<T>(entity.id())),
        }
    }

    async fn delete(&self, entity: &T) -> Result<(), RepositoryError> {
        let mut db = self.db.lock().unwrap();
        T::table(&mut db).remove(&entity.id()).ok_or_else(|| stale::<T>(entity.id()))?;
        T::on_delete(&mut db, entity.id());
        Ok(())
    }
}

/// Router over in-memory repositories; the pool points nowhere and is only touched by /ready.
pub fn test_app(repo: &MemoryRepository) -> Router {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy("postgres://postgres@127.0.0.1:1/unreachable")
        .unwrap();
    let state = AppState {
        pool,
        clients: Arc::new(repo.clone()),
        products: Arc::new(repo.clone()),
        sales: Arc::new(repo.clone()),
    };
    app(state)
}

/// Seed the Client1 / Product1 fixture: one client, two products, two sales.
pub fn seed_client_with_sales(repo: &MemoryRepository) -> (Client, Product, Product) {
    let client = repo.seed(Client::new("Client1"));
    let p1 = repo.seed(Product::new("Product1", Decimal::new(10, 0)));
    let p2 = repo.seed(Product::new("Product2", Decimal::new(2050, 2)));
    repo.seed(Sales::new(client.id, p1.id));
    repo.seed(Sales::new(client.id, p2.id));
    (client, p1, p2)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    TestResponse { status, location, body }
}
