//! Person record handlers.
//!
//! ```text
//! GET    /men
//! GET    /men/{id}
//! POST   /men       {"name":"Ada","country":"UK"}
//! PUT    /men/{id}  {"name":"Ada Lovelace","country":"UK"}
//! DELETE /men/{id}
//! ```
//!
//! Each handler issues exactly one repository call. Failures come back as
//! [`Error`] values; nothing here terminates the process.

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::ports::MenRepositoryError;
use crate::domain::{Error, Person, PersonId, PersonIdError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// JSON shape of a person record, used for requests and responses.
///
/// Decoding is permissive: unknown fields are ignored and missing fields
/// become empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PersonBody {
    /// Person's name.
    #[schema(example = "Ada")]
    pub name: String,
    /// Person's country.
    #[schema(example = "UK")]
    pub country: String,
}

impl From<PersonBody> for Person {
    fn from(body: PersonBody) -> Self {
        Self::new(body.name, body.country)
    }
}

impl From<Person> for PersonBody {
    fn from(person: Person) -> Self {
        Self {
            name: person.name().to_owned(),
            country: person.country().to_owned(),
        }
    }
}

fn map_id_error(err: &PersonIdError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": "id", "value": err.raw() }))
}

fn parse_id(raw: &str) -> ApiResult<PersonId> {
    raw.parse().map_err(|err| map_id_error(&err))
}

fn map_repository_error(err: MenRepositoryError) -> Error {
    error!(error = %err, "men repository failure");
    Error::internal(err.to_string())
}

fn not_found(id: PersonId) -> Error {
    Error::not_found(format!("no person with id {id}"))
}

/// List every stored person.
#[utoipa::path(
    get,
    path = "/men",
    responses(
        (status = 200, description = "All stored records", body = [PersonBody]),
        (status = 500, description = "Store failure", body = Error)
    ),
    tags = ["men"],
    operation_id = "listMen"
)]
pub async fn list_men(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<PersonBody>>> {
    let men = state.men.list().await.map_err(map_repository_error)?;
    Ok(web::Json(men.into_iter().map(PersonBody::from).collect()))
}

/// Fetch one person by row identity.
#[utoipa::path(
    get,
    path = "/men/{id}",
    params(("id" = i64, Path, description = "Row identity")),
    responses(
        (status = 200, description = "Matching record", body = PersonBody),
        (status = 400, description = "Id is not an integer", body = Error),
        (status = 404, description = "No such record", body = Error),
        (status = 500, description = "Store failure", body = Error)
    ),
    tags = ["men"],
    operation_id = "getMan"
)]
pub async fn get_man(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PersonBody>> {
    let id = parse_id(&path)?;
    let person = state
        .men
        .find_by_id(id)
        .await
        .map_err(map_repository_error)?
        .ok_or_else(|| not_found(id))?;
    Ok(web::Json(person.into()))
}

/// Insert a person and echo the decoded body.
///
/// The assigned identity is reported in the `Location` header.
#[utoipa::path(
    post,
    path = "/men",
    request_body = PersonBody,
    responses(
        (status = 200, description = "Echo of the stored record", body = PersonBody,
            headers(("Location" = String, description = "Path of the new record"))),
        (status = 400, description = "Malformed JSON body", body = Error),
        (status = 500, description = "Store failure", body = Error)
    ),
    tags = ["men"],
    operation_id = "createMan"
)]
pub async fn create_man(
    state: web::Data<HttpState>,
    payload: web::Json<PersonBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let person = Person::from(body.clone());
    let id = state
        .men
        .create(&person)
        .await
        .map_err(map_repository_error)?;
    Ok(HttpResponse::Ok()
        .insert_header((LOCATION, format!("/men/{id}")))
        .json(body))
}

/// Overwrite a person and echo the decoded body.
#[utoipa::path(
    put,
    path = "/men/{id}",
    params(("id" = i64, Path, description = "Row identity")),
    request_body = PersonBody,
    responses(
        (status = 200, description = "Echo of the stored record", body = PersonBody),
        (status = 400, description = "Malformed id or JSON body", body = Error),
        (status = 404, description = "No such record", body = Error),
        (status = 500, description = "Store failure", body = Error)
    ),
    tags = ["men"],
    operation_id = "updateMan"
)]
pub async fn update_man(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<PersonBody>,
) -> ApiResult<web::Json<PersonBody>> {
    let id = parse_id(&path)?;
    let body = payload.into_inner();
    let updated = state
        .men
        .update(id, &Person::from(body.clone()))
        .await
        .map_err(map_repository_error)?;
    if updated == 0 {
        return Err(not_found(id));
    }
    Ok(web::Json(body))
}

/// Remove a person and echo the id as a JSON string.
#[utoipa::path(
    delete,
    path = "/men/{id}",
    params(("id" = i64, Path, description = "Row identity")),
    responses(
        (status = 200, description = "Echo of the deleted id", body = String),
        (status = 400, description = "Id is not an integer", body = Error),
        (status = 404, description = "No such record", body = Error),
        (status = 500, description = "Store failure", body = Error)
    ),
    tags = ["men"],
    operation_id = "deleteMan"
)]
pub async fn delete_man(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<String>> {
    let raw = path.into_inner();
    let id = parse_id(&raw)?;
    let deleted = state.men.delete(id).await.map_err(map_repository_error)?;
    if deleted == 0 {
        return Err(not_found(id));
    }
    Ok(web::Json(raw))
}
