//! Sales API: clients, products and sales over PostgreSQL, served with axum.

pub mod dto;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod mapping;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod settings;
pub mod sql;
pub mod state;
pub mod validation;

pub use dto::{ClientDto, ProductDto, SalesDto};
pub use entity::{Client, ClientRelation, Entity, Product, Sales, SalesRelation};
pub use error::{AppError, ConfigError, FieldErrors, RepositoryError};
pub use mapping::ENTITY_MAPPINGS;
pub use repository::{PgRepository, Repository};
pub use routes::{api_routes, app, common_routes, openapi_routes, ApiDoc};
pub use schema::{ensure_database_exists, sync_schema};
pub use settings::Settings;
pub use state::AppState;
