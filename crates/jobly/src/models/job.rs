use super::{double_option, from_json};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::monitor::LoggedClient;
use crate::row::{FromRow, RowExt, map_rows};
use crate::sql::{
    FieldMap, FilterCriteria, FilterTarget, UpdatePayload, sql_for_filter, sql_for_partial_update,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Updatable job fields already match their columns.
pub const JOB_FIELDS: FieldMap = FieldMap::EMPTY;

/// Job search: salary range and title substring.
pub const JOB_FILTER: FilterTarget = FilterTarget {
    numeric_column: "salary",
    text_column: "title",
    lower_key: "minSalary",
    upper_key: "maxSalary",
    substring_key: "title",
};

const COLUMNS: &str = "id, title, salary, equity, company_handle";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl NewJob {
    pub fn from_json(value: serde_json::Value) -> JoblyResult<Self> {
        from_json(value)
    }
}

/// Partial update of a job.
///
/// There is no way to change a job's `id` or the company it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub equity: Option<Option<Decimal>>,
}

impl JobPatch {
    pub fn from_json(value: serde_json::Value) -> JoblyResult<Self> {
        from_json(value)
    }

    pub fn to_payload(&self) -> UpdatePayload {
        let mut payload = UpdatePayload::new();
        payload
            .insert_opt("title", self.title.clone())
            .insert_opt("salary", self.salary)
            .insert_opt("equity", self.equity);
        payload
    }
}

impl Job {
    /// Insert a job and return it.
    ///
    /// Fails with a bad request if the company does not exist.
    pub async fn create(conn: &impl GenericClient, data: NewJob) -> JoblyResult<Job> {
        let conn = LoggedClient::new(conn);

        let company = conn
            .query_opt_tagged(
                "jobs.create.check",
                "SELECT handle FROM companies WHERE handle = $1",
                &[&data.company_handle],
            )
            .await?;
        if company.is_none() {
            return Err(JoblyError::bad_request(format!(
                "No company exists with handle {}",
                data.company_handle
            )));
        }

        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            COLUMNS
        );
        let rows = conn
            .query_tagged(
                "jobs.create",
                &sql,
                &[&data.title, &data.salary, &data.equity, &data.company_handle],
            )
            .await?;
        let row = rows
            .first()
            .ok_or_else(|| JoblyError::not_found("INSERT returned no row"))?;
        Job::from_row(row)
    }

    /// All jobs, ordered by title.
    pub async fn find_all(conn: &impl GenericClient) -> JoblyResult<Vec<Job>> {
        let conn = LoggedClient::new(conn);
        let sql = format!("SELECT {} FROM jobs ORDER BY title, id", COLUMNS);
        let rows = conn.query_tagged("jobs.find_all", &sql, &[]).await?;
        map_rows(&rows)
    }

    /// Jobs matching `criteria`, ordered by title.
    ///
    /// Rejects a minimum salary above the maximum.
    pub async fn find_filtered(
        conn: &impl GenericClient,
        criteria: Option<&FilterCriteria>,
    ) -> JoblyResult<Vec<Job>> {
        if let Some(c) = criteria {
            c.check_range(&JOB_FILTER)?;
        }
        let filter = sql_for_filter(&JOB_FILTER, criteria)?;

        let conn = LoggedClient::new(conn);
        let sql = format!(
            "SELECT {} FROM jobs {} ORDER BY title, id",
            COLUMNS,
            filter.clause()
        );
        let rows = conn
            .query_tagged("jobs.find_filtered", &sql, &filter.params_ref())
            .await?;
        map_rows(&rows)
    }

    // The caller supplies an already-logged client.
    pub(crate) async fn find_for_company(
        conn: &impl GenericClient,
        handle: &str,
    ) -> JoblyResult<Vec<Job>> {
        let sql = format!(
            "SELECT {} FROM jobs WHERE company_handle = $1 ORDER BY id",
            COLUMNS
        );
        let rows = conn
            .query_tagged("jobs.find_for_company", &sql, &[&handle])
            .await?;
        map_rows(&rows)
    }

    pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<Job> {
        let conn = LoggedClient::new(conn);
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", COLUMNS);
        let row = conn
            .query_opt_tagged("jobs.get", &sql, &[&id])
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {id}")))?;
        Job::from_row(&row)
    }

    /// Apply a partial update; fields may be set to NULL where the column allows.
    pub async fn update(conn: &impl GenericClient, id: i32, patch: &JobPatch) -> JoblyResult<Job> {
        let set = sql_for_partial_update(&patch.to_payload(), &JOB_FIELDS)?;

        let conn = LoggedClient::new(conn);
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {}",
            set.clause(),
            set.next_placeholder(),
            COLUMNS
        );
        let mut params = set.params_ref();
        params.push(&id);

        let row = conn
            .query_opt_tagged("jobs.update", &sql, &params)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {id}")))?;
        Job::from_row(&row)
    }

    pub async fn remove(conn: &impl GenericClient, id: i32) -> JoblyResult<()> {
        let conn = LoggedClient::new(conn);
        let deleted = conn
            .execute_tagged("jobs.remove", "DELETE FROM jobs WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(JoblyError::not_found(format!("No job: {id}")));
        }
        Ok(())
    }
}
