//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] gathers the CRUD handlers, the health probes and the shared
//! payload schemas. The document is served at `/api-docs/openapi.json` and
//! printed by the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::men::PersonBody;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Men service API",
        description = "CRUD over name and country records, plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::men::list_men,
        crate::inbound::http::men::get_man,
        crate::inbound::http::men::create_man,
        crate::inbound::http::men::update_man,
        crate::inbound::http::men::delete_man,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(PersonBody, Error, ErrorCode)),
    tags(
        (name = "men", description = "Create, read, update and delete records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
