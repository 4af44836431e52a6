//! PostgreSQL-backed `MenRepository` implementation using Diesel ORM.
//!
//! Every operation is a single parameterized statement; no transactions are
//! opened, so concurrent writers to the same row resolve last-writer-wins.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::info;

use crate::domain::ports::{MenRepository, MenRepositoryError};
use crate::domain::{Person, PersonId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{PersonRow, PersonValues};
use super::pool::DbPool;
use super::schema::{ENSURE_MEN_SCHEMA, men};

/// Diesel-backed implementation of the men repository port.
#[derive(Clone)]
pub struct DieselMenRepository {
    pool: DbPool,
}

impl DieselMenRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Provision the `men` table if it is missing.
    ///
    /// Safe to run on every start. A table left behind by an id-less
    /// deployment gains its identity column, and a 32-bit identity is
    /// widened to 64 bits.
    ///
    /// # Errors
    ///
    /// Returns [`MenRepositoryError`] when a connection cannot be obtained or
    /// the DDL fails.
    pub async fn ensure_schema(&self) -> Result<(), MenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        for statement in ENSURE_MEN_SCHEMA {
            diesel::sql_query(statement)
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        }
        info!(table = "men", "schema ensured");
        Ok(())
    }
}

#[async_trait]
impl MenRepository for DieselMenRepository {
    async fn list(&self) -> Result<Vec<Person>, MenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PersonRow> = men::table
            .select(PersonRow::as_select())
            .order(men::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Person::from).collect())
    }

    async fn find_by_id(&self, id: PersonId) -> Result<Option<Person>, MenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PersonRow> = men::table
            .find(id.as_i64())
            .select(PersonRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Person::from))
    }

    async fn create(&self, person: &Person) -> Result<PersonId, MenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: i64 = diesel::insert_into(men::table)
            .values(PersonValues::from(person))
            .returning(men::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(PersonId::new(id))
    }

    async fn update(&self, id: PersonId, person: &Person) -> Result<usize, MenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(men::table.find(id.as_i64()))
            .set(PersonValues::from(person))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn delete(&self, id: PersonId) -> Result<usize, MenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(men::table.find(id.as_i64()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
