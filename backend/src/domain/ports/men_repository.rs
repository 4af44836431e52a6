//! Port for persisting person records.

use async_trait::async_trait;

use crate::domain::{Person, PersonId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by men repository adapters.
    pub enum MenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "men repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "men repository query failed: {message}",
    }
}

/// Port for reading and writing person records.
///
/// Every method maps to exactly one statement against the store. Mutations
/// report how many rows they touched so callers can tell a missing id apart
/// from a successful write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenRepository: Send + Sync {
    /// Every stored record, ordered by identity.
    async fn list(&self) -> Result<Vec<Person>, MenRepositoryError>;

    /// The record stored under `id`, if any.
    async fn find_by_id(&self, id: PersonId) -> Result<Option<Person>, MenRepositoryError>;

    /// Insert a record and return its assigned identity.
    async fn create(&self, person: &Person) -> Result<PersonId, MenRepositoryError>;

    /// Overwrite the record stored under `id`; returns rows affected.
    async fn update(&self, id: PersonId, person: &Person) -> Result<usize, MenRepositoryError>;

    /// Remove the record stored under `id`; returns rows affected.
    async fn delete(&self, id: PersonId) -> Result<usize, MenRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
///
/// Reads see an empty table and writes touch nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMenRepository;

#[async_trait]
impl MenRepository for FixtureMenRepository {
    async fn list(&self) -> Result<Vec<Person>, MenRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: PersonId) -> Result<Option<Person>, MenRepositoryError> {
        Ok(None)
    }

    async fn create(&self, _person: &Person) -> Result<PersonId, MenRepositoryError> {
        Ok(PersonId::new(1))
    }

    async fn update(&self, _id: PersonId, _person: &Person) -> Result<usize, MenRepositoryError> {
        Ok(0)
    }

    async fn delete(&self, _id: PersonId) -> Result<usize, MenRepositoryError> {
        Ok(0)
    }
}
