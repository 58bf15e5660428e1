//! `tracing`-based SQL logging.

use crate::client::GenericClient;
use crate::error::JoblyResult;
use std::borrow::Cow;
use std::time::Instant;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Longest SQL text (in bytes) written to a log event.
const MAX_LOGGED_SQL: usize = 200;

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// SQL as it appears in log events: cut to `max_bytes` with a `...` marker.
fn display_sql(sql: &str, max_bytes: usize) -> Cow<'_, str> {
    if sql.len() > max_bytes {
        Cow::Owned(format!("{}...", truncate_sql_bytes(sql, max_bytes)))
    } else {
        Cow::Borrowed(sql)
    }
}

/// A client wrapper that emits the SQL it is about to execute, and how it went.
///
/// Events go to target `jobly.sql`: a `debug` event before the statement
/// runs, and a `warn` if it fails.
#[derive(Debug, Clone)]
pub struct LoggedClient<C> {
    inner: C,
}

impl<C: GenericClient> LoggedClient<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    fn emit(&self, tag: &str, sql: &str, param_count: usize) {
        let sql = display_sql(sql, MAX_LOGGED_SQL);
        tracing::debug!(
            target: "jobly.sql",
            tag,
            param_count,
            sql = %sql,
        );
    }

    fn finish<T>(&self, tag: &str, started: Instant, result: JoblyResult<T>) -> JoblyResult<T> {
        if let Err(e) = &result {
            tracing::warn!(
                target: "jobly.sql",
                tag,
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %e,
                "statement failed"
            );
        }
        result
    }
}

impl<C: GenericClient> GenericClient for LoggedClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<Vec<Row>> {
        self.query_tagged("-", sql, params).await
    }

    async fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> JoblyResult<Vec<Row>> {
        self.emit(tag, sql, params.len());
        let started = Instant::now();
        let result = self.inner.query_tagged(tag, sql, params).await;
        self.finish(tag, started, result)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> JoblyResult<u64> {
        self.execute_tagged("-", sql, params).await
    }

    async fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> JoblyResult<u64> {
        self.emit(tag, sql, params.len());
        let started = Instant::now();
        let result = self.inner.execute_tagged(tag, sql, params).await;
        self.finish(tag, started, result)
    }
}
