//! Row mapping traits

use crate::error::{QueryError, QueryResult};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

/// Converts a database row into a result type.
///
/// Usually derived with `#[derive(FromRow)]`, which reads each field from
/// the column its entity property is bound to.
///
/// # Example
///
/// ```ignore
/// use predql::{Entity, FromRow};
///
/// #[derive(Entity, FromRow)]
/// #[predql(backing = "ContactEntity", rename_all = "camelCase")]
/// struct Contact {
///     first_name: String,
///     last_name: String,
///     age: i32,
/// }
/// ```
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> QueryResult<Self>;
}

/// Typed column access with decode errors that name the column.
pub trait RowExt {
    fn try_get_column<T>(&self, column: &str) -> QueryResult<T>
    where
        T: for<'a> FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> QueryResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| QueryError::decode(column, e.to_string()))
    }
}
