//! Test utilities for the service crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and when the `test-support` feature is enabled.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{MenRepository, MenRepositoryError};
use crate::domain::{Person, PersonId};

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Person>,
}

/// In-memory stand-in for the Postgres adapter.
///
/// Identities start at 1 and are never reused, matching a `BIGSERIAL`
/// column.
#[derive(Debug, Default)]
pub struct InMemoryMenRepository {
    table: Mutex<Table>,
}

impl InMemoryMenRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> Result<MutexGuard<'_, Table>, MenRepositoryError> {
        self.table
            .lock()
            .map_err(|_| MenRepositoryError::query("in-memory table lock poisoned"))
    }
}

#[async_trait]
impl MenRepository for InMemoryMenRepository {
    async fn list(&self) -> Result<Vec<Person>, MenRepositoryError> {
        Ok(self.table()?.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: PersonId) -> Result<Option<Person>, MenRepositoryError> {
        Ok(self.table()?.rows.get(&id.as_i64()).cloned())
    }

    async fn create(&self, person: &Person) -> Result<PersonId, MenRepositoryError> {
        let mut table = self.table()?;
        table.next_id += 1;
        let id = table.next_id;
        table.rows.insert(id, person.clone());
        Ok(PersonId::new(id))
    }

    async fn update(&self, id: PersonId, person: &Person) -> Result<usize, MenRepositoryError> {
        let mut table = self.table()?;
        let Some(row) = table.rows.get_mut(&id.as_i64()) else {
            return Ok(0);
        };
        *row = person.clone();
        Ok(1)
    }

    async fn delete(&self, id: PersonId) -> Result<usize, MenRepositoryError> {
        Ok(usize::from(self.table()?.rows.remove(&id.as_i64()).is_some()))
    }
}

#[cfg(test)]
mod tests {
    //! Behaviour of the in-memory repository.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn identities_are_not_reused() {
        let repo = InMemoryMenRepository::new();
        let first = repo.create(&Person::new("Ada", "UK")).await.expect("create");
        assert_eq!(repo.delete(first).await.expect("delete"), 1);
        let second = repo.create(&Person::new("Alan", "UK")).await.expect("create");

        assert_eq!(first, PersonId::new(1));
        assert_eq!(second, PersonId::new(2));
        assert_eq!(repo.list().await.expect("list"), vec![Person::new("Alan", "UK")]);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_rows_report_zero_affected() {
        let repo = InMemoryMenRepository::new();
        let id = PersonId::new(9);
        assert_eq!(repo.update(id, &Person::default()).await.expect("update"), 0);
        assert_eq!(repo.delete(id).await.expect("delete"), 0);
        assert!(repo.find_by_id(id).await.expect("find").is_none());
    }
}
