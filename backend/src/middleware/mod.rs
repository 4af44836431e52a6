//! Request middleware.
//!
//! Two independent interceptors wrap every route: [`Trace`] (outermost) opens
//! the request span, then [`JsonContentType`] fixes the response media type.

pub mod json_content_type;
pub mod trace;

pub use json_content_type::JsonContentType;
pub use trace::Trace;
