//! Domain types shared by the inbound and outbound adapters.
//!
//! Nothing here knows about HTTP or SQL; adapters translate at the edges.

pub mod error;
pub mod person;
pub mod ports;
mod trace_id;

pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::person::{Person, PersonId, PersonIdError};
pub use self::trace_id::TraceId;
