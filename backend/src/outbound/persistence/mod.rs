//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Connections come from a shared `bb8` pool via `diesel-async`, and
//! every database error is mapped onto [`MenRepositoryError`].
//!
//! ```ignore
//! use men_service::outbound::persistence::{DbPool, DieselMenRepository, PoolConfig};
//!
//! let pool = DbPool::connect(PoolConfig::new("postgres://localhost/men")).await?;
//! let repo = DieselMenRepository::new(pool);
//! repo.ensure_schema().await?;
//! ```
//!
//! [`MenRepositoryError`]: crate::domain::ports::MenRepositoryError

mod diesel_men_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_men_repository::DieselMenRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
