//! Row mapping traits

use crate::error::{JoblyError, JoblyResult};
use tokio_postgres::Row;

/// Trait for converting a database row into a record
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> JoblyResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning JoblyError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> JoblyResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> JoblyResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| JoblyError::decode(column, e.to_string()))
    }
}

/// Map every row, stopping at the first decode failure.
pub(crate) fn map_rows<T: FromRow>(rows: &[Row]) -> JoblyResult<Vec<T>> {
    rows.iter().map(T::from_row).collect()
}
