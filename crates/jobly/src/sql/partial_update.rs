use super::{ClauseResult, push_placeholder};
use crate::error::{JoblyError, JoblyResult};
use crate::value::SqlValue;

/// Logical field name to storage column name.
///
/// Column names cannot be parameterized, so a map is only ever built from a
/// `'static` table: one constant per entity, never from request data.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    entries: &'static [(&'static str, &'static str)],
}

impl FieldMap {
    /// A map with no entries: every field is its own column.
    pub const EMPTY: FieldMap = FieldMap { entries: &[] };

    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Column for `field`, falling back to the field name itself.
    pub fn column<'a>(&self, field: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(logical, _)| *logical == field)
            .map_or(field, |(_, column)| *column)
    }
}

impl Default for FieldMap {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Ordered field/value pairs for a partial update.
///
/// Iteration order is insertion order; placeholder numbering follows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePayload {
    entries: Vec<(&'static str, SqlValue)>,
}

impl UpdatePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field (consuming version of [`UpdatePayload::insert`]).
    pub fn set(mut self, field: &'static str, value: impl Into<SqlValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field. Re-setting a field replaces its value and keeps its position.
    pub fn insert(&mut self, field: &'static str, value: impl Into<SqlValue>) -> &mut Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((field, value)),
        }
        self
    }

    /// Set a field only when a value is present (`None` => skip).
    pub fn insert_opt<T: Into<SqlValue>>(
        &mut self,
        field: &'static str,
        value: Option<T>,
    ) -> &mut Self {
        if let Some(v) = value {
            self.insert(field, v);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(f, _)| *f)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SqlValue)> + '_ {
        self.entries.iter().map(|(f, v)| (*f, v))
    }
}

/// Build the body of a `SET` clause for a partial update.
///
/// Produces `"<column>"=$n` fragments joined by `", "`, one per payload
/// field in payload order, with each column resolved through `fields`.
///
/// Returns [`JoblyError::NoData`] for an empty payload.
pub fn sql_for_partial_update(
    payload: &UpdatePayload,
    fields: &FieldMap,
) -> JoblyResult<ClauseResult> {
    if payload.is_empty() {
        return Err(JoblyError::NoData);
    }

    let mut clause = String::new();
    let mut values = Vec::with_capacity(payload.len());
    for (i, (field, value)) in payload.iter().enumerate() {
        if i > 0 {
            clause.push_str(", ");
        }
        push_quoted(&mut clause, fields.column(field));
        clause.push('=');
        push_placeholder(&mut clause, i + 1);
        values.push(value.clone());
    }

    tracing::trace!(
        target: "jobly.sql",
        clause = %clause,
        param_count = values.len(),
        "built SET clause"
    );
    Ok(ClauseResult::new(clause, values))
}

/// Write `name` as a quoted identifier, doubling any embedded `"`.
fn push_quoted(out: &mut String, name: &str) {
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}
