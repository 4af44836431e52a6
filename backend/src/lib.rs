//! HTTP CRUD service over a Postgres `men` table.
//!
//! The crate follows a ports-and-adapters layout: [`domain`] holds the
//! record types and the repository port, [`inbound`] the actix-web
//! handlers, and [`outbound`] the Diesel adapter. [`server`] wires them
//! together behind the [`middleware`] chain.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;
pub mod telemetry;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
