//! Diesel table definitions and the DDL that provisions them.
//!
//! `name` and `country` stay nullable: rows written by an earlier deployment
//! may hold NULLs, which read back as empty strings.

diesel::table! {
    /// Person records.
    men (id) {
        /// Row identity assigned by the `BIGSERIAL` sequence.
        id -> Int8,
        /// Person's name.
        name -> Nullable<Text>,
        /// Person's country.
        country -> Nullable<Text>,
    }
}

/// Create the table when absent.
pub(crate) const CREATE_MEN_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS men (id BIGSERIAL PRIMARY KEY, name TEXT, country TEXT)";

/// Give a pre-existing id-less `men` table its identity column.
pub(crate) const ADD_MEN_ID_COLUMN: &str =
    "ALTER TABLE men ADD COLUMN IF NOT EXISTS id BIGSERIAL PRIMARY KEY";

/// Widen an identity column created elsewhere as `SERIAL` so it decodes as
/// `Int8`. A column that cannot be cast fails the statement.
pub(crate) const WIDEN_MEN_ID_COLUMN: &str = "ALTER TABLE men ALTER COLUMN id TYPE BIGINT";

/// Widen the sequence behind a `SERIAL` identity to match.
pub(crate) const WIDEN_MEN_ID_SEQUENCE: &str = "ALTER SEQUENCE IF EXISTS men_id_seq AS BIGINT";

/// Statements run in order to bring any `men` table to the expected shape.
pub(crate) const ENSURE_MEN_SCHEMA: [&str; 4] = [
    CREATE_MEN_TABLE,
    ADD_MEN_ID_COLUMN,
    WIDEN_MEN_ID_COLUMN,
    WIDEN_MEN_ID_SEQUENCE,
];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn table_is_created_before_it_is_altered() {
        assert_eq!(ENSURE_MEN_SCHEMA.first(), Some(&CREATE_MEN_TABLE));
        assert!(
            ENSURE_MEN_SCHEMA
                .iter()
                .skip(1)
                .all(|statement| statement.starts_with("ALTER"))
        );
    }

    #[rstest]
    fn identity_is_widened_to_bigint() {
        assert!(ENSURE_MEN_SCHEMA.contains(&WIDEN_MEN_ID_COLUMN));
        assert!(WIDEN_MEN_ID_COLUMN.ends_with("TYPE BIGINT"));
    }
}
