//! HTTP inbound adapter exposing the REST endpoints.

pub mod error;
pub mod health;
pub mod men;
pub mod routes;
pub mod state;

pub use error::ApiResult;
