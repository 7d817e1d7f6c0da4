//! Microsoft Graph and identity platform response models

use serde::Deserialize;
use serde_json::{Map, Value};

/// One page of a Graph collection response
#[derive(Debug, Clone, Deserialize)]
pub struct GraphPage<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    /// Absolute URL of the next page, absent on the last page
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// Group reference returned by a `$select=id` lookup
#[derive(Debug, Clone, Deserialize)]
pub struct GroupRef {
    pub id: String,
}

/// A group member with only the selected attributes present.
///
/// Members are users, devices or nested groups; only the requested
/// identifier attribute matters, so the record stays untyped.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct MemberRecord(pub Map<String, Value>);

impl MemberRecord {
    /// String value of `attribute`, if present, non-null and non-empty
    pub fn attribute(&self, attribute: &str) -> Option<&str> {
        self.0
            .get(attribute)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

/// Successful client-credentials token response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Lifetime the identity platform issues when a response omits `expires_in`
fn default_expires_in() -> u64 {
    3599
}

/// Error body returned by the token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}
