//! HTTP handlers for client, product and sales CRUD.

pub mod clients;
pub mod products;
pub mod sales;
