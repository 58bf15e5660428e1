//! Record access for companies and jobs.
//!
//! Every function takes any [`GenericClient`](crate::GenericClient) and logs
//! the statements it runs through [`LoggedClient`](crate::LoggedClient).

mod company;
mod job;

pub use company::{COMPANY_FIELDS, COMPANY_FILTER, Company, CompanyDetail, CompanyPatch, NewCompany};
pub use job::{JOB_FIELDS, JOB_FILTER, Job, JobPatch, NewJob};

use crate::error::{JoblyError, JoblyResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes "absent" from "null".
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`: a missing
/// key stays `None`, an explicit `null` becomes `Some(None)`.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Decode a request body, reporting shape problems as a bad request.
pub(crate) fn from_json<T: DeserializeOwned>(value: serde_json::Value) -> JoblyResult<T> {
    serde_json::from_value(value).map_err(|e| JoblyError::bad_request(e.to_string()))
}
