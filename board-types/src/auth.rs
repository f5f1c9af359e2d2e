use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Query parameters that carry one-shot credentials and must never be echoed
/// back in a redirect.
pub const CREDENTIAL_QUERY_PARAMS: [&str; 3] = ["code", "token_hash", "type"];

/// Identity attributes resolved from a completed sign-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthIdentity {
    pub id: Uuid,
    pub email: Option<String>,
    pub last_sign_in_at: Option<String>, // ISO 8601 string
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub invited: bool,
}

impl AuthIdentity {
    pub fn has_signed_in_before(&self) -> bool {
        self.last_sign_in_at
            .as_deref()
            .is_some_and(|at| !at.is_empty())
    }
}

/// Where the auth callback sends the browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RedirectTarget {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl RedirectTarget {
    /// Build a target keeping the inbound query minus credential parameters
    pub fn new(path: impl Into<String>, query: &[(String, String)]) -> Self {
        let query = query
            .iter()
            .filter(|(key, _)| !CREDENTIAL_QUERY_PARAMS.contains(&key.as_str()))
            .cloned()
            .collect();

        Self {
            path: path.into(),
            query,
        }
    }
}
