//! Row structs mapping between Diesel and [`Person`].

use diesel::prelude::*;

use crate::domain::Person;

use super::schema::men;

/// Projection read back from `men`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = men)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PersonRow {
    pub name: Option<String>,
    pub country: Option<String>,
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        Self::new(row.name.unwrap_or_default(), row.country.unwrap_or_default())
    }
}

/// Column values written by inserts and updates.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = men)]
pub(crate) struct PersonValues<'a> {
    pub name: &'a str,
    pub country: &'a str,
}

impl<'a> From<&'a Person> for PersonValues<'a> {
    fn from(person: &'a Person) -> Self {
        Self {
            name: person.name(),
            country: person.country(),
        }
    }
}
