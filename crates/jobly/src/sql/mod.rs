//! Parameterized clause builders.
//!
//! Both builders are pure: they turn a sparse set of fields (or filter
//! criteria) into a clause carrying `$1, $2, ...` placeholders plus the
//! ordered list of values those placeholders bind to. The caller splices
//! the clause into its own statement text.
//!
//! # Example
//!
//! ```ignore
//! use jobly::sql::{sql_for_partial_update, FieldMap, UpdatePayload};
//!
//! const FIELDS: FieldMap = FieldMap::new(&[("numEmployees", "num_employees")]);
//!
//! let payload = UpdatePayload::new()
//!     .set("name", "Acme")
//!     .set("numEmployees", 12);
//! let set = sql_for_partial_update(&payload, &FIELDS)?;
//! assert_eq!(set.clause(), r#""name"=$1, "num_employees"=$2"#);
//!
//! let sql = format!(
//!     "UPDATE companies SET {} WHERE handle = ${}",
//!     set.clause(),
//!     set.next_placeholder()
//! );
//! ```

mod filter;
mod partial_update;


pub use filter::{Filter, FilterCriteria, FilterTarget, sql_for_filter};
pub use partial_update::{FieldMap, UpdatePayload, sql_for_partial_update};

use crate::value::SqlValue;
use tokio_postgres::types::ToSql;

/// A clause with positional placeholders and the values they bind to.
///
/// The i-th value binds to placeholder `$i`; placeholders appear in the
/// clause in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseResult {
    clause: String,
    values: Vec<SqlValue>,
}

impl ClauseResult {
    pub(crate) fn new(clause: String, values: Vec<SqlValue>) -> Self {
        Self { clause, values }
    }

    /// The rendered clause text.
    pub fn clause(&self) -> &str {
        &self.clause
    }

    /// Bound values, in placeholder order.
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Index of the first placeholder not used by this clause.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values
            .iter()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect()
    }

    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.clause, self.values)
    }
}

/// Append `$idx` to `out`.
pub(crate) fn push_placeholder(out: &mut String, idx: usize) {
    use std::fmt::Write;
    let _ = write!(out, "${idx}");
}
