//! # jobly
//!
//! Companies and jobs records over PostgreSQL.
//!
//! The interesting part lives in [`sql`]: two pure builders that turn a
//! sparse set of fields, or a set of search filters, into a clause with
//! `$1, $2, ...` placeholders plus the ordered values to bind. Everything
//! else is thin record access over `tokio-postgres` built on top of them.
//!
//! ```ignore
//! use jobly::{Company, CompanyPatch, FilterCriteria};
//!
//! let pool = jobly::create_pool(&jobly::Config::from_env()?)?;
//! let client = pool.get().await?;
//!
//! let small = FilterCriteria::new().like("off").max(50);
//! let companies = Company::find_filtered(&client, Some(&small)).await?;
//!
//! let patch = CompanyPatch { num_employees: Some(Some(51)), ..Default::default() };
//! Company::update(&client, "office-co", &patch).await?;
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod monitor;
pub mod row;
pub mod sql;
pub mod value;

#[cfg(feature = "pool")]
pub mod pool;

pub use auth::{
    Claims, TokenVerifier, authenticate, ensure_admin, ensure_admin_or_self, ensure_logged_in,
};
pub use client::GenericClient;
pub use config::Config;
pub use error::{JoblyError, JoblyResult};
pub use models::{Company, CompanyDetail, CompanyPatch, Job, JobPatch, NewCompany, NewJob};
pub use monitor::LoggedClient;
pub use row::{FromRow, RowExt};
pub use sql::{
    ClauseResult, FieldMap, Filter, FilterCriteria, FilterTarget, UpdatePayload, sql_for_filter,
    sql_for_partial_update,
};
pub use value::SqlValue;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_size};
