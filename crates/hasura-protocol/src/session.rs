//! Session variables forwarded by the Hasura engine.
//!
//! Keys are case-insensitive: every key is lower-cased on the way in, so
//! `X-Hasura-Role` and `x-hasura-role` address the same entry.

use std::collections::BTreeMap;

use http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::error::HasuraError;
use crate::headers::{Headers, ROLE_ADMIN};

/// Case-insensitive session variable map.
///
/// A JSON `null` deserializes to an empty map; the engine sends `null` for
/// changes made outside GraphQL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "Option<BTreeMap<String, String>>",
    into = "BTreeMap<String, String>"
)]
pub struct SessionVariables {
    values: BTreeMap<String, String>,
}

impl SessionVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from HTTP headers. Only the first value of a repeated header is
    /// kept, and values that are not valid UTF-8 are skipped.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut values = BTreeMap::new();
        for name in headers.keys() {
            if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
                values.insert(name.as_str().to_ascii_lowercase(), value.to_string());
            }
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn set(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.values.insert(key.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(&key.to_ascii_lowercase())
    }

    /// Value of `x-hasura-role`, if present.
    pub fn role(&self) -> Option<&str> {
        self.get(Headers::X_HASURA_ROLE)
    }

    /// Value of `x-request-id`, if present.
    pub fn request_id(&self) -> Option<&str> {
        self.get(Headers::X_REQUEST_ID)
    }

    /// Whether the current role matches any of `roles`, ignoring case.
    pub fn is_role_of(&self, roles: &[&str]) -> bool {
        match self.role() {
            Some(role) => roles.iter().any(|r| r.eq_ignore_ascii_case(role)),
            None => false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(ROLE_ADMIN)
    }

    /// The role, or a `bad_request` error when it is missing or empty.
    pub fn require_role(&self) -> Result<&str, HasuraError> {
        match self.role() {
            Some(role) if !role.is_empty() => Ok(role),
            _ => Err(HasuraError::bad_request(format!(
                "{} session variable is required",
                Headers::X_HASURA_ROLE
            ))),
        }
    }

    /// A copy without the given keys.
    pub fn filter_keys(&self, keys: &[&str]) -> Self {
        let mut filtered = self.clone();
        for key in keys {
            filtered.remove(key);
        }
        filtered
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.values
    }
}

impl<K, V> FromIterator<(K, V)> for SessionVariables
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut variables = Self::new();
        for (key, value) in iter {
            variables.set(key, value);
        }
        variables
    }
}

impl From<BTreeMap<String, String>> for SessionVariables {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Option<BTreeMap<String, String>>> for SessionVariables {
    fn from(map: Option<BTreeMap<String, String>>) -> Self {
        map.map(Self::from).unwrap_or_default()
    }
}

impl From<std::collections::HashMap<String, String>> for SessionVariables {
    fn from(map: std::collections::HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<SessionVariables> for BTreeMap<String, String> {
    fn from(variables: SessionVariables) -> Self {
        variables.values
    }
}
