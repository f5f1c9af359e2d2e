use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use board_types::AuthIdentity;

/// Kinds of one-time token the identity provider can verify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpKind {
    Signup,
    Invite,
    Magiclink,
    Recovery,
    EmailChange,
    Email,
}

impl OtpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpKind::Signup => "signup",
            OtpKind::Invite => "invite",
            OtpKind::Magiclink => "magiclink",
            OtpKind::Recovery => "recovery",
            OtpKind::EmailChange => "email_change",
            OtpKind::Email => "email",
        }
    }
}

impl FromStr for OtpKind {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signup" => Ok(OtpKind::Signup),
            "invite" => Ok(OtpKind::Invite),
            "magiclink" => Ok(OtpKind::Magiclink),
            "recovery" => Ok(OtpKind::Recovery),
            "email_change" => Ok(OtpKind::EmailChange),
            "email" => Ok(OtpKind::Email),
            other => Err(IdentityError::UnknownOtpKind(other.to_string())),
        }
    }
}

impl fmt::Display for OtpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An established session plus the identity it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub expires_in: Option<u64>, // seconds
    pub identity: AuthIdentity,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Identity provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Identity provider rejected credential ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Unexpected identity provider response: {0}")]
    InvalidResponse(String),
    #[error("Malformed credential: {0}")]
    MalformedCredential(String),
    #[error("Unknown one-time token type: {0}")]
    UnknownOtpKind(String),
}

/// Resolves sign-in credentials into a session
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange a PKCE authorization code
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<AuthSession, IdentityError>;

    /// Verify a one-time token hash of the given kind
    async fn verify_one_time_token(
        &self,
        token_hash: &str,
        kind: OtpKind,
    ) -> Result<AuthSession, IdentityError>;
}

#[derive(Debug, Serialize)]
struct PkceExchange<'a> {
    auth_code: &'a str,
    code_verifier: &'a str,
}

#[derive(Debug, Serialize)]
struct OtpVerification<'a> {
    #[serde(rename = "type")]
    kind: OtpKind,
    token_hash: &'a str,
}

#[derive(Debug, Deserialize)]
struct GoTrueSession {
    access_token: String,
    expires_in: Option<u64>,
    user: GoTrueUser,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: Uuid,
    email: Option<String>,
    last_sign_in_at: Option<String>,
    #[serde(default)]
    user_metadata: GoTrueUserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct GoTrueUserMetadata {
    #[serde(rename = "firstName")]
    first_name: Option<String>,
    #[serde(rename = "lastName")]
    last_name: Option<String>,
    invited: Option<serde_json::Value>,
}

impl From<GoTrueSession> for AuthSession {
    fn from(session: GoTrueSession) -> Self {
        let user = session.user;
        // only a literal `true` marks an invited signup
        let invited = matches!(user.user_metadata.invited, Some(serde_json::Value::Bool(true)));

        AuthSession {
            access_token: session.access_token,
            expires_in: session.expires_in,
            identity: AuthIdentity {
                id: user.id,
                email: user.email,
                last_sign_in_at: user.last_sign_in_at,
                first_name: user.user_metadata.first_name,
                last_name: user.user_metadata.last_name,
                invited,
            },
        }
    }
}

/// Supabase GoTrue client
pub struct SupabaseIdentityProvider {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseIdentityProvider {
    pub fn new(base_url: String, anon_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        }
    }

    async fn post_for_session<B: Serialize + Sync>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<AuthSession, IdentityError> {
        tracing::debug!("Requesting session from {}", url);

        let response = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!("Identity provider returned status {}: {}", status, message);
            return Err(IdentityError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let session: GoTrueSession = response
            .json()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;
        Ok(session.into())
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<AuthSession, IdentityError> {
        let url = format!("{}/auth/v1/token?grant_type=pkce", self.base_url);
        let body = PkceExchange {
            auth_code: code,
            code_verifier: code_verifier.unwrap_or_default(),
        };
        self.post_for_session(&url, &body).await
    }

    async fn verify_one_time_token(
        &self,
        token_hash: &str,
        kind: OtpKind,
    ) -> Result<AuthSession, IdentityError> {
        let url = format!("{}/auth/v1/verify", self.base_url);
        let body = OtpVerification { kind, token_hash };
        self.post_for_session(&url, &body).await
    }
}
