//! Person records persisted in the `men` table.
//!
//! Neither field is validated: the store accepts any text, including empty
//! strings, and callers that omit a field get an empty value.

use std::fmt;
use std::str::FromStr;

/// A name/country pair.
///
/// # Examples
/// ```
/// use men_service::domain::Person;
///
/// let person = Person::new("Ada", "UK");
/// assert_eq!(person.name(), "Ada");
/// assert_eq!(person.country(), "UK");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    name: String,
    country: String,
}

impl Person {
    /// Build a record from its two fields.
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
        }
    }

    /// Person's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Person's country.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }
}

/// Row identity of a stored [`Person`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonId(i64);

impl PersonId {
    /// Wrap a raw row identity.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw row identity.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a path segment is not a row identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("person id must be an integer, got {raw:?}")]
pub struct PersonIdError {
    raw: String,
}

impl PersonIdError {
    /// The rejected input.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl FromStr for PersonId {
    type Err = PersonIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| PersonIdError { raw: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", 1)]
    #[case(" 42 ", 42)]
    #[case("-3", -3)]
    fn parses_integer_ids(#[case] raw: &str, #[case] expected: i64) {
        let id: PersonId = raw.parse().expect("integer id");
        assert_eq!(id.as_i64(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("1.5")]
    #[case("99999999999999999999")]
    fn rejects_non_integer_ids(#[case] raw: &str) {
        let err = raw.parse::<PersonId>().expect_err("not an id");
        assert_eq!(err.raw(), raw);
    }

    #[test]
    fn default_person_has_empty_fields() {
        let person = Person::default();
        assert_eq!(person, Person::new("", ""));
    }
}
