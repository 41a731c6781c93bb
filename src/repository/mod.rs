//! Generic repository over mapped entities: CRUD plus eager loading of declared relations.

mod pg;
pub use pg::PgRepository;

use crate::entity::Entity;
use crate::error::RepositoryError;
use async_trait::async_trait;

/// Uniform data access for any [`Entity`]. Each call is its own unit of work: reads use one
/// pooled connection, writes one transaction that commits before returning.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Row with this identity, `None` when absent.
    async fn get(&self, id: i32) -> Result<Option<T>, RepositoryError>;

    async fn get_all(&self) -> Result<Vec<T>, RepositoryError>;

    /// All rows with every relation in `includes` fetched by the same statement.
    async fn get_all_with_eager_loading(&self, includes: &[T::Relation]) -> Result<Vec<T>, RepositoryError>;

    /// Like [`Repository::get_all_with_eager_loading`] filtered to one identity.
    /// More than one matching row is [`RepositoryError::NonUniqueResult`].
    async fn get_by_id_with_eager_loading(
        &self,
        id: i32,
        includes: &[T::Relation],
    ) -> Result<Option<T>, RepositoryError>;

    /// Insert and write the generated identity back into `entity`.
    async fn add(&self, entity: &mut T) -> Result<(), RepositoryError>;

    async fn update(&self, entity: &T) -> Result<(), RepositoryError>;

    async fn delete(&self, entity: &T) -> Result<(), RepositoryError>;
}
