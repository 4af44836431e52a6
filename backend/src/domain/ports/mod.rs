//! Domain ports implemented by outbound adapters.

mod macros;
mod men_repository;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use men_repository::MockMenRepository;
pub use men_repository::{FixtureMenRepository, MenRepository, MenRepositoryError};
