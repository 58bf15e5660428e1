//! Bound parameter values.
//!
//! Clause builders hand back their arguments as an ordered list of
//! [`SqlValue`]s. Unlike a list of `Box<dyn ToSql>`, the list can be compared
//! and inspected, and each value still binds straight into `tokio-postgres`.

use bytes::BytesMut;
use rust_decimal::Decimal;
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type};

/// A single positional parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i32),
    BigInt(i64),
    Numeric(Decimal),
    Text(String),
}

impl ToSql for SqlValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            // Integers widen to the column's type so `$n` works against
            // int4, int8 and numeric columns alike.
            SqlValue::Int(v) => match *ty {
                Type::INT8 => i64::from(*v).to_sql_checked(ty, out),
                Type::NUMERIC => Decimal::from(*v).to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            SqlValue::BigInt(v) => match *ty {
                Type::INT4 => i32::try_from(*v)?.to_sql_checked(ty, out),
                Type::NUMERIC => Decimal::from(*v).to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            SqlValue::Numeric(v) => v.to_sql_checked(ty, out),
            SqlValue::Text(v) => v.to_sql_checked(ty, out),
        }
    }

    // Per-variant checks happen in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::BigInt(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Numeric(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_none_is_null() {
        assert_eq!(SqlValue::from(None::<i32>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some(5)), SqlValue::Int(5));
    }

    #[test]
    fn null_encodes_as_sql_null() {
        let mut buf = BytesMut::new();
        let is_null = SqlValue::Null.to_sql(&Type::TEXT, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
        assert!(buf.is_empty());
    }

    #[test]
    fn int_widens_to_int8() {
        let mut buf = BytesMut::new();
        SqlValue::Int(7).to_sql(&Type::INT8, &mut buf).unwrap();
        assert_eq!(&buf[..], &7_i64.to_be_bytes());
    }

    #[test]
    fn int_encodes_as_int4() {
        let mut buf = BytesMut::new();
        SqlValue::Int(7).to_sql(&Type::INT4, &mut buf).unwrap();
        assert_eq!(&buf[..], &7_i32.to_be_bytes());
    }

    #[test]
    fn text_rejects_integer_column() {
        let mut buf = BytesMut::new();
        assert!(
            SqlValue::from("abc")
                .to_sql(&Type::INT4, &mut buf)
                .is_err()
        );
    }

    #[test]
    fn bigint_out_of_range_for_int4_errors() {
        let mut buf = BytesMut::new();
        assert!(
            SqlValue::BigInt(i64::MAX)
                .to_sql(&Type::INT4, &mut buf)
                .is_err()
        );
    }
}
