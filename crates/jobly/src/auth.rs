//! Request authentication and authorization guards.
//!
//! Verifying a token's signature is left to a [`TokenVerifier`]; this module
//! extracts the bearer token, hands it over, and decides what the resulting
//! [`Claims`] are allowed to do.

use crate::error::{JoblyError, JoblyResult};
use serde::{Deserialize, Serialize};

/// Payload carried by a verified token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    pub fn new(username: impl Into<String>, is_admin: bool) -> Self {
        Self {
            username: username.into(),
            is_admin,
            iat: None,
        }
    }
}

/// Checks a token and yields its claims.
///
/// Returns `None` for any token that fails verification.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Option<Claims>;
}

impl<F> TokenVerifier for F
where
    F: Fn(&str) -> Option<Claims> + Send + Sync,
{
    fn verify(&self, token: &str) -> Option<Claims> {
        self(token)
    }
}

/// Resolve the current user from an `Authorization` header value.
///
/// A missing header, a non-bearer scheme or a rejected token all yield
/// `None`; authentication never fails the request by itself.
pub fn authenticate(authorization: Option<&str>, verifier: &impl TokenVerifier) -> Option<Claims> {
    let header = authorization?.trim();
    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        return None;
    }

    let claims = verifier.verify(token);
    if claims.is_none() {
        tracing::debug!(target: "jobly.auth", "rejected bearer token");
    }
    claims
}

/// Require a logged-in user.
pub fn ensure_logged_in(user: Option<&Claims>) -> JoblyResult<&Claims> {
    match user {
        Some(claims) if !claims.username.is_empty() => Ok(claims),
        _ => Err(JoblyError::unauthorized("login required")),
    }
}

/// Require a logged-in admin.
pub fn ensure_admin(user: Option<&Claims>) -> JoblyResult<&Claims> {
    match user {
        Some(claims) if claims.is_admin => Ok(claims),
        _ => Err(JoblyError::unauthorized("admin required")),
    }
}

/// Require an admin, or the user named by `username`.
pub fn ensure_admin_or_self<'a>(
    user: Option<&'a Claims>,
    username: &str,
) -> JoblyResult<&'a Claims> {
    match user {
        Some(claims) if claims.is_admin => Ok(claims),
        Some(claims) if !claims.username.is_empty() && claims.username == username => Ok(claims),
        _ => Err(JoblyError::unauthorized("admin or same user required")),
    }
}
