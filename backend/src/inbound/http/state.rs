//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data`, so they depend only on the
//! repository port and can be exercised with doubles.

use std::sync::Arc;

use crate::domain::ports::MenRepository;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Store behind every `/men` route.
    pub men: Arc<dyn MenRepository>,
}

impl HttpState {
    /// Bundle the repository handle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use men_service::domain::ports::FixtureMenRepository;
    /// use men_service::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(Arc::new(FixtureMenRepository));
    /// let _men = state.men.clone();
    /// ```
    #[must_use]
    pub const fn new(men: Arc<dyn MenRepository>) -> Self {
        Self { men }
    }
}
