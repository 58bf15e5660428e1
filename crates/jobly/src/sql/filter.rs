use super::{ClauseResult, push_placeholder};
use crate::error::{JoblyError, JoblyResult};
use crate::value::SqlValue;
use std::mem::discriminant;

/// One supported search filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Inclusive lower bound on the numeric column.
    LowerBound(i32),
    /// Inclusive upper bound on the numeric column.
    UpperBound(i32),
    /// Case-insensitive substring match on the text column.
    Substring(String),
}

/// What a filter applies to for one entity: its columns and the external
/// query keys that name each filter kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterTarget {
    pub numeric_column: &'static str,
    pub text_column: &'static str,
    pub lower_key: &'static str,
    pub upper_key: &'static str,
    pub substring_key: &'static str,
}

/// Ordered search criteria; at most one filter of each kind.
///
/// The order filters were added in is the order of the rendered clause and
/// of its placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    filters: Vec<Filter>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an inclusive lower bound.
    pub fn min(mut self, value: i32) -> Self {
        self.push(Filter::LowerBound(value));
        self
    }

    /// Add an inclusive upper bound.
    pub fn max(mut self, value: i32) -> Self {
        self.push(Filter::UpperBound(value));
        self
    }

    /// Add a substring match.
    pub fn like(mut self, pattern: impl Into<String>) -> Self {
        self.push(Filter::Substring(pattern.into()));
        self
    }

    /// Add a filter. A filter of a kind already present replaces it in place.
    pub fn push(&mut self, filter: Filter) -> &mut Self {
        match self
            .filters
            .iter_mut()
            .find(|f| discriminant(&**f) == discriminant(&filter))
        {
            Some(slot) => *slot = filter,
            None => self.filters.push(filter),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> + '_ {
        self.filters.iter()
    }

    pub fn lower_bound(&self) -> Option<i32> {
        self.filters.iter().find_map(|f| match f {
            Filter::LowerBound(v) => Some(*v),
            _ => None,
        })
    }

    pub fn upper_bound(&self) -> Option<i32> {
        self.filters.iter().find_map(|f| match f {
            Filter::UpperBound(v) => Some(*v),
            _ => None,
        })
    }

    pub fn substring(&self) -> Option<&str> {
        self.filters.iter().find_map(|f| match f {
            Filter::Substring(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Reject a lower bound above the upper bound.
    ///
    /// The clause builder does not check this; record access calls it first.
    pub fn check_range(&self, target: &FilterTarget) -> JoblyResult<()> {
        match (self.lower_bound(), self.upper_bound()) {
            (Some(lo), Some(hi)) if lo > hi => Err(JoblyError::bad_request(format!(
                "{} must be greater than {}",
                target.upper_key, target.lower_key
            ))),
            _ => Ok(()),
        }
    }

    /// Parse criteria from ordered query-string pairs.
    ///
    /// Keys are matched against `target`; any other key is rejected rather
    /// than treated as a substring filter. Returns `Ok(None)` when there are
    /// no pairs at all.
    pub fn from_query_pairs<K, V>(
        target: &FilterTarget,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> JoblyResult<Option<Self>>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = Self::new();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            let filter = if key == target.lower_key {
                Filter::LowerBound(parse_bound(key, value)?)
            } else if key == target.upper_key {
                Filter::UpperBound(parse_bound(key, value)?)
            } else if key == target.substring_key {
                Filter::Substring(value.to_string())
            } else {
                return Err(JoblyError::bad_request(format!(
                    "unsupported filter: {key}"
                )));
            };
            criteria.push(filter);
        }
        Ok((!criteria.is_empty()).then_some(criteria))
    }
}

fn parse_bound(key: &str, value: &str) -> JoblyResult<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| JoblyError::bad_request(format!("{key} must be an integer, got '{value}'")))
}

/// Build a `WHERE ...` clause from search criteria.
///
/// Each filter renders in criteria order and the fragments are joined with
/// `" AND "`; the leading `WHERE ` is part of the output. Substring values are
/// bound wrapped as `%value%`.
///
/// Returns [`JoblyError::NoCriteria`] when `criteria` is absent or empty.
pub fn sql_for_filter(
    target: &FilterTarget,
    criteria: Option<&FilterCriteria>,
) -> JoblyResult<ClauseResult> {
    let criteria = match criteria {
        Some(c) if !c.is_empty() => c,
        _ => return Err(JoblyError::NoCriteria),
    };

    let mut clause = String::from("WHERE ");
    let mut values = Vec::with_capacity(criteria.len());
    for (i, filter) in criteria.iter().enumerate() {
        if i > 0 {
            clause.push_str(" AND ");
        }
        match filter {
            Filter::LowerBound(v) => {
                clause.push_str(target.numeric_column);
                clause.push_str(" >= ");
                values.push(SqlValue::Int(*v));
            }
            Filter::UpperBound(v) => {
                clause.push_str(target.numeric_column);
                clause.push_str(" <= ");
                values.push(SqlValue::Int(*v));
            }
            Filter::Substring(s) => {
                clause.push_str(target.text_column);
                clause.push_str(" ILIKE ");
                values.push(SqlValue::Text(format!("%{s}%")));
            }
        }
        push_placeholder(&mut clause, i + 1);
    }

    tracing::trace!(
        target: "jobly.sql",
        clause = %clause,
        param_count = values.len(),
        "built WHERE clause"
    );
    Ok(ClauseResult::new(clause, values))
}
