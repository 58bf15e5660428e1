use super::{Job, double_option, from_json};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::monitor::LoggedClient;
use crate::row::{FromRow, RowExt, map_rows};
use crate::sql::{
    FieldMap, FilterCriteria, FilterTarget, UpdatePayload, sql_for_filter, sql_for_partial_update,
};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Update fields whose column name differs from the field name.
pub const COMPANY_FIELDS: FieldMap =
    FieldMap::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);

/// Company search: employee-count range and name substring.
pub const COMPANY_FILTER: FilterTarget = FilterTarget {
    numeric_column: "num_employees",
    text_column: "name",
    lower_key: "minEmployees",
    upper_key: "maxEmployees",
    substring_key: "nameLike",
};

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: Option<String>,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// A company together with its jobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl NewCompany {
    pub fn from_json(value: serde_json::Value) -> JoblyResult<Self> {
        from_json(value)
    }
}

/// Partial update of a company. `handle` is not updatable.
///
/// Outer `None` leaves a field untouched; `Some(None)` sets it to NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub num_employees: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub logo_url: Option<Option<String>>,
}

impl CompanyPatch {
    pub fn from_json(value: serde_json::Value) -> JoblyResult<Self> {
        from_json(value)
    }

    /// Present fields, in declaration order, keyed by their external names.
    pub fn to_payload(&self) -> UpdatePayload {
        let mut payload = UpdatePayload::new();
        payload
            .insert_opt("name", self.name.clone())
            .insert_opt("description", self.description.clone())
            .insert_opt("numEmployees", self.num_employees)
            .insert_opt("logoUrl", self.logo_url.clone());
        payload
    }
}

impl Company {
    /// Insert a company and return it.
    ///
    /// Fails with a bad request if the handle is taken.
    pub async fn create(conn: &impl GenericClient, data: NewCompany) -> JoblyResult<Company> {
        let conn = LoggedClient::new(conn);

        let duplicate = conn
            .query_opt_tagged(
                "companies.create.check",
                "SELECT handle FROM companies WHERE handle = $1",
                &[&data.handle],
            )
            .await?;
        if duplicate.is_some() {
            return Err(JoblyError::bad_request(format!(
                "Duplicate company: {}",
                data.handle
            )));
        }

        let sql = format!(
            "INSERT INTO companies ({COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}",
            COLUMNS = COLUMNS
        );
        let rows = conn
            .query_tagged(
                "companies.create",
                &sql,
                &[
                    &data.handle,
                    &data.name,
                    &data.description,
                    &data.num_employees,
                    &data.logo_url,
                ],
            )
            .await?;
        let row = rows
            .first()
            .ok_or_else(|| JoblyError::not_found("INSERT returned no row"))?;
        Company::from_row(row)
    }

    /// All companies, ordered by name.
    pub async fn find_all(conn: &impl GenericClient) -> JoblyResult<Vec<Company>> {
        let conn = LoggedClient::new(conn);
        let sql = format!("SELECT {} FROM companies ORDER BY name", COLUMNS);
        let rows = conn.query_tagged("companies.find_all", &sql, &[]).await?;
        map_rows(&rows)
    }

    /// Companies matching `criteria`, ordered by name.
    ///
    /// Rejects a minimum employee count above the maximum.
    pub async fn find_filtered(
        conn: &impl GenericClient,
        criteria: Option<&FilterCriteria>,
    ) -> JoblyResult<Vec<Company>> {
        if let Some(c) = criteria {
            c.check_range(&COMPANY_FILTER)?;
        }
        let filter = sql_for_filter(&COMPANY_FILTER, criteria)?;

        let conn = LoggedClient::new(conn);
        let sql = format!(
            "SELECT {} FROM companies {} ORDER BY name",
            COLUMNS,
            filter.clause()
        );
        let rows = conn
            .query_tagged("companies.find_filtered", &sql, &filter.params_ref())
            .await?;
        map_rows(&rows)
    }

    /// A company and its jobs.
    pub async fn get(conn: &impl GenericClient, handle: &str) -> JoblyResult<CompanyDetail> {
        let conn = LoggedClient::new(conn);

        let sql = format!("SELECT {} FROM companies WHERE handle = $1", COLUMNS);
        let row = conn
            .query_opt_tagged("companies.get", &sql, &[&handle])
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;
        let company = Company::from_row(&row)?;

        let jobs = Job::find_for_company(&conn, handle).await?;
        Ok(CompanyDetail { company, jobs })
    }

    /// Apply a partial update; only fields present in `patch` change.
    ///
    /// Fails with [`JoblyError::NoData`] for an empty patch, and not found if
    /// no company has `handle`.
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        patch: &CompanyPatch,
    ) -> JoblyResult<Company> {
        let set = sql_for_partial_update(&patch.to_payload(), &COMPANY_FIELDS)?;

        let conn = LoggedClient::new(conn);
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {}",
            set.clause(),
            set.next_placeholder(),
            COLUMNS
        );
        let mut params = set.params_ref();
        params.push(&handle);

        let row = conn
            .query_opt_tagged("companies.update", &sql, &params)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;
        Company::from_row(&row)
    }

    /// Delete a company (its jobs go with it).
    pub async fn remove(conn: &impl GenericClient, handle: &str) -> JoblyResult<()> {
        let conn = LoggedClient::new(conn);
        let deleted = conn
            .execute_tagged(
                "companies.remove",
                "DELETE FROM companies WHERE handle = $1",
                &[&handle],
            )
            .await?;
        if deleted == 0 {
            return Err(JoblyError::not_found(format!("No company: {handle}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::stub::StubClient;
    use crate::sql::sql_for_partial_update;
    use crate::value::SqlValue;
    use serde_json::json;

    #[test]
    fn patch_payload_keeps_declaration_order() {
        let patch = CompanyPatch {
            name: Some("New".into()),
            num_employees: Some(Some(10)),
            logo_url: Some(None),
            ..Default::default()
        };
        let payload = patch.to_payload();
        assert_eq!(
            payload.fields().collect::<Vec<_>>(),
            vec!["name", "numEmployees", "logoUrl"]
        );

        let set = sql_for_partial_update(&payload, &COMPANY_FIELDS).unwrap();
        assert_eq!(
            set.clause(),
            r#""name"=$1, "num_employees"=$2, "logo_url"=$3"#
        );
        assert_eq!(
            set.values(),
            &[SqlValue::from("New"), SqlValue::Int(10), SqlValue::Null]
        );
        assert_eq!(set.next_placeholder(), 4);
    }

    #[test]
    fn empty_patch_is_no_data() {
        let payload = CompanyPatch::default().to_payload();
        let err = sql_for_partial_update(&payload, &COMPANY_FIELDS).unwrap_err();
        assert!(matches!(err, JoblyError::NoData));
    }

    #[test]
    fn patch_json_distinguishes_null_from_absent() {
        let patch =
            CompanyPatch::from_json(json!({"description": null, "numEmployees": 3})).unwrap();
        assert_eq!(patch.name, None);
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.num_employees, Some(Some(3)));
        assert_eq!(patch.logo_url, None);
    }

    #[test]
    fn patch_json_rejects_handle() {
        let err = CompanyPatch::from_json(json!({"handle": "other"})).unwrap_err();
        assert!(err.is_bad_request());
    }

    #[test]
    fn new_company_json() {
        let data = NewCompany::from_json(json!({
            "handle": "c1",
            "name": "C1",
            "numEmployees": 1,
            "logoUrl": "http://c1.img"
        }))
        .unwrap();
        assert_eq!(data.num_employees, Some(1));
        assert_eq!(data.description, None);

        assert!(NewCompany::from_json(json!({"name": "no handle"})).is_err());
    }

    #[test]
    fn company_serializes_camel_case() {
        let company = Company {
            handle: "c1".into(),
            name: "C1".into(),
            description: Some("Desc1".into()),
            num_employees: Some(1),
            logo_url: None,
        };
        assert_eq!(
            serde_json::to_value(&company).unwrap(),
            json!({
                "handle": "c1",
                "name": "C1",
                "description": "Desc1",
                "numEmployees": 1,
                "logoUrl": null
            })
        );
    }

    #[tokio::test]
    async fn remove_reports_missing_company() {
        let stub = StubClient::affecting(0);
        let err = Company::remove(&stub, "nope").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: No company: nope");

        let stub = StubClient::affecting(1);
        Company::remove(&stub, "c1").await.unwrap();
        assert_eq!(
            stub.statements(),
            vec![("DELETE FROM companies WHERE handle = $1".to_string(), 1)]
        );
    }
}
