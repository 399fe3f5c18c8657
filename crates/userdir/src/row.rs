//! Row mapping traits

use crate::error::{DirectoryError, DirectoryResult};
use crate::model::{Gender, UserRecord};
use tokio_postgres::Row;

/// Trait for types that can be constructed from a database row.
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> DirectoryResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning DirectoryError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> DirectoryResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> DirectoryResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| DirectoryError::decode(column, e.to_string()))
    }
}

impl FromRow for UserRecord {
    fn from_row(row: &Row) -> DirectoryResult<Self> {
        let gender = row
            .try_get_column::<Option<String>>("gender")?
            .map(|label| {
                label
                    .parse::<Gender>()
                    .map_err(|e| DirectoryError::decode("gender", e.to_string()))
            })
            .transpose()?;

        Ok(Self {
            id: row.try_get_column("id")?,
            name: row.try_get_column("name")?,
            surname: row.try_get_column("surname")?,
            patronymic: row.try_get_column("patronymic")?,
            age: row.try_get_column("age")?,
            gender,
            country: row.try_get_column("country")?,
        })
    }
}

/// Single-column `RETURNING id` rows.
impl FromRow for i32 {
    fn from_row(row: &Row) -> DirectoryResult<Self> {
        row.try_get(0)
            .map_err(|e| DirectoryError::decode("0", e.to_string()))
    }
}
