use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};

use board_types::AuthIdentity;

pub const LOGSNAG_ENDPOINT: &str = "https://api.logsnag.com/v1/log";
const USERS_CHANNEL: &str = "users";
const SIGNUP_ICON: &str = "🧑‍💻";

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Analytics request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Analytics service returned status {0}")]
    Status(u16),
}

/// Records product events about users
#[async_trait]
pub trait AnalyticsEmitter: Send + Sync {
    async fn track(&self, event: &str, identity: &AuthIdentity) -> Result<(), AnalyticsError>;
}

#[derive(Debug, Serialize)]
struct LogSnagTags<'a> {
    email: &'a str,
    firstname: Option<&'a str>,
    lastname: Option<&'a str>,
    env: &'a str,
}

#[derive(Debug, Serialize)]
struct LogSnagEvent<'a> {
    project: &'a str,
    channel: &'a str,
    event: &'a str,
    user_id: &'a str,
    icon: &'a str,
    notify: bool,
    tags: LogSnagTags<'a>,
}

pub struct LogSnagClient {
    client: Client,
    token: String,
    project: String,
    environment: String,
}

impl LogSnagClient {
    pub fn new(token: String, project: String, environment: String) -> Self {
        Self {
            client: Client::new(),
            token,
            project,
            environment,
        }
    }
}

#[async_trait]
impl AnalyticsEmitter for LogSnagClient {
    async fn track(&self, event: &str, identity: &AuthIdentity) -> Result<(), AnalyticsError> {
        let email = identity.email.as_deref().unwrap_or_default();
        let body = LogSnagEvent {
            project: &self.project,
            channel: USERS_CHANNEL,
            event,
            user_id: email,
            icon: SIGNUP_ICON,
            notify: true,
            tags: LogSnagTags {
                email,
                firstname: identity.first_name.as_deref(),
                lastname: identity.last_name.as_deref(),
                env: &self.environment,
            },
        };

        let response = self
            .client
            .post(LOGSNAG_ENDPOINT)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnalyticsError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Used when no analytics token is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAnalytics;

#[async_trait]
impl AnalyticsEmitter for NoopAnalytics {
    async fn track(&self, event: &str, identity: &AuthIdentity) -> Result<(), AnalyticsError> {
        debug!("Analytics disabled, dropping '{}' for {}", event, identity.id);
        Ok(())
    }
}

/// Emit an event without letting a failure reach the caller
pub async fn emit_best_effort(
    emitter: &dyn AnalyticsEmitter,
    event: &str,
    identity: &AuthIdentity,
) {
    match emitter.track(event, identity).await {
        Ok(()) => info!("Tracked '{}' for {}", event, identity.id),
        Err(e) => warn!("Failed to track '{}' for {}: {}", event, identity.id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_logsnag_payload_shape() {
        let body = LogSnagEvent {
            project: "wordle-teams",
            channel: USERS_CHANNEL,
            event: "User Signup",
            user_id: "ana@example.com",
            icon: SIGNUP_ICON,
            notify: true,
            tags: LogSnagTags {
                email: "ana@example.com",
                firstname: Some("Ana"),
                lastname: None,
                env: "production",
            },
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["channel"], json!("users"));
        assert_eq!(value["user_id"], json!("ana@example.com"));
        assert_eq!(value["notify"], json!(true));
        assert_eq!(value["tags"]["firstname"], json!("Ana"));
        assert_eq!(value["tags"]["lastname"], json!(null));
        assert_eq!(value["tags"]["env"], json!("production"));
    }
}
