use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use tracing::{error, info, warn};

use board_persistence::repositories::InvitationRepository;
use board_types::{AuthIdentity, RedirectTarget};

use super::identity::{AuthSession, IdentityError, IdentityProvider, OtpKind};
use crate::analytics::{AnalyticsEmitter, emit_best_effort};

pub const ERROR_PATH: &str = "/login-error";
pub const DEFAULT_LANDING_PATH: &str = "/me";
pub const COMPLETE_PROFILE_PATH: &str = "/complete-profile";

/// Analytics event recorded for a first sign-in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupEvent {
    UserSignup,
    InvitedUserSignup,
}

impl SignupEvent {
    pub fn label(&self) -> &'static str {
        match self {
            SignupEvent::UserSignup => "User Signup",
            SignupEvent::InvitedUserSignup => "Invited User Signup",
        }
    }

    /// Invitation wins over a plain first sign-in
    pub fn classify(identity: &AuthIdentity) -> Option<Self> {
        if identity.invited {
            Some(SignupEvent::InvitedUserSignup)
        } else if !identity.has_signed_in_before() {
            Some(SignupEvent::UserSignup)
        } else {
            None
        }
    }
}

/// Completes the team side of an invited signup
#[async_trait]
pub trait InvitationFinalizer: Send + Sync {
    /// Keyed by the identity's email; its names seed a new player row
    async fn finalize(&self, identity: &AuthIdentity) -> anyhow::Result<()>;
}

#[async_trait]
impl InvitationFinalizer for InvitationRepository {
    async fn finalize(&self, identity: &AuthIdentity) -> anyhow::Result<()> {
        self.finalize_invitation(identity).await?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("No exchange code or one-time token in callback")]
    MissingCredential,
    #[error("Could not resolve credential: {0}")]
    ProviderResolution(#[from] IdentityError),
    #[error("Could not finalize invitation: {0}")]
    Finalization(String),
}

/// A credential pulled from the callback query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    ExchangeCode {
        code: String,
        code_verifier: Option<String>,
    },
    OneTimeToken {
        token_hash: String,
        kind: OtpKind,
    },
}

/// The inbound callback: query pairs plus the PKCE verifier cookie
#[derive(Debug, Clone, Default)]
pub struct CallbackRequest {
    query: Vec<(String, String)>,
    code_verifier: Option<String>,
}

impl CallbackRequest {
    pub fn new(query: Vec<(String, String)>) -> Self {
        Self {
            query,
            code_verifier: None,
        }
    }

    pub fn with_code_verifier(mut self, code_verifier: Option<String>) -> Self {
        self.code_verifier = code_verifier.filter(|v| !v.is_empty());
        self
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, value)| key == name && !value.is_empty())
            .map(|(_, value)| value.as_str())
    }

    /// The `next` hint when it is a local path, the landing path otherwise
    pub fn next_path(&self) -> &str {
        match self.param("next") {
            Some(path) if is_local_path(path) => path,
            Some(path) => {
                warn!("Ignoring non-local next path: {}", path);
                DEFAULT_LANDING_PATH
            }
            None => DEFAULT_LANDING_PATH,
        }
    }

    /// An exchange code takes precedence over a token hash. A token hash
    /// with a missing or unknown type counts as no credential.
    pub fn credential(&self) -> Result<Credential, CallbackError> {
        if let Some(code) = self.param("code") {
            return Ok(Credential::ExchangeCode {
                code: code.to_string(),
                code_verifier: self.code_verifier.clone(),
            });
        }

        match (self.param("token_hash"), self.param("type")) {
            (Some(token_hash), Some(kind)) => match kind.parse::<OtpKind>() {
                Ok(kind) => Ok(Credential::OneTimeToken {
                    token_hash: token_hash.to_string(),
                    kind,
                }),
                Err(e) => {
                    warn!("{}", e);
                    Err(CallbackError::MissingCredential)
                }
            },
            _ => Err(CallbackError::MissingCredential),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallbackResponse {
    pub redirect: RedirectTarget,
    /// Present only when sign-in succeeded
    pub session: Option<AuthSession>,
}

/// Turns an auth-callback request into exactly one redirect
pub struct AuthCallback {
    identity_provider: Arc<dyn IdentityProvider>,
    invitations: Arc<dyn InvitationFinalizer>,
    analytics: Arc<dyn AnalyticsEmitter>,
}

impl AuthCallback {
    pub fn new(
        identity_provider: Arc<dyn IdentityProvider>,
        invitations: Arc<dyn InvitationFinalizer>,
        analytics: Arc<dyn AnalyticsEmitter>,
    ) -> Self {
        Self {
            identity_provider,
            invitations,
            analytics,
        }
    }

    pub async fn handle(&self, request: &CallbackRequest) -> CallbackResponse {
        match AssertUnwindSafe(self.run(request)).catch_unwind().await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!("Auth callback failed: {}", e);
                Self::error_response(request)
            }
            Err(panic) => {
                error!("Unexpected error in auth callback: {}", panic_message(panic.as_ref()));
                Self::error_response(request)
            }
        }
    }

    async fn run(&self, request: &CallbackRequest) -> Result<CallbackResponse, CallbackError> {
        let credential = request.credential()?;
        let session = self.resolve(credential).await?;
        let identity = &session.identity;

        if let Some(event) = SignupEvent::classify(identity) {
            emit_best_effort(self.analytics.as_ref(), event.label(), identity).await;
        }

        let path = if identity.invited {
            self.invitations
                .finalize(identity)
                .await
                .map_err(|e| CallbackError::Finalization(format!("{:#}", e)))?;
            COMPLETE_PROFILE_PATH
        } else {
            request.next_path()
        };

        info!("Signed in {} and redirecting to {}", identity.id, path);
        Ok(CallbackResponse {
            redirect: RedirectTarget::new(path, request.query()),
            session: Some(session),
        })
    }

    async fn resolve(&self, credential: Credential) -> Result<AuthSession, CallbackError> {
        let session = match credential {
            Credential::ExchangeCode {
                code,
                code_verifier,
            } => {
                self.identity_provider
                    .exchange_code(&code, code_verifier.as_deref())
                    .await?
            }
            Credential::OneTimeToken { token_hash, kind } => {
                self.identity_provider
                    .verify_one_time_token(&token_hash, kind)
                    .await?
            }
        };
        Ok(session)
    }

    fn error_response(request: &CallbackRequest) -> CallbackResponse {
        CallbackResponse {
            redirect: RedirectTarget::new(ERROR_PATH, request.query()),
            session: None,
        }
    }
}

/// Same-origin absolute path
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
