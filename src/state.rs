//! Shared application state for all routes.

use crate::entity::{Client, Product, Sales};
use crate::repository::{PgRepository, Repository};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Used directly only by the readiness probe.
    pub pool: PgPool,
    pub clients: Arc<dyn Repository<Client>>,
    pub products: Arc<dyn Repository<Product>>,
    pub sales: Arc<dyn Repository<Sales>>,
}

impl AppState {
    /// State with PostgreSQL repositories sharing one pool.
    pub fn new(pool: PgPool) -> Self {
        AppState {
            clients: Arc::new(PgRepository::<Client>::new(pool.clone())),
            products: Arc::new(PgRepository::<Product>::new(pool.clone())),
            sales: Arc::new(PgRepository::<Sales>::new(pool.clone())),
            pool,
        }
    }
}
