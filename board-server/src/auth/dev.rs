use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use uuid::Uuid;

use board_types::AuthIdentity;

use super::identity::{AuthSession, IdentityError, IdentityProvider, OtpKind};
use super::token::{SupabaseJwtClaims, UserMetadataClaims};

const DEV_SESSION_SECONDS: u64 = 3600;

/// Parse a `user_id:email:name` dev credential.
///
/// An id that is not a UUID gets a fresh random one. The name is split into
/// first and last name on the first space.
pub fn parse_dev_identity(raw: &str) -> Result<AuthIdentity, IdentityError> {
    let parts: Vec<&str> = raw.splitn(3, ':').collect();
    if parts.len() < 3 || parts[1].is_empty() {
        return Err(IdentityError::MalformedCredential(
            "expected user_id:email:name".to_string(),
        ));
    }

    let id = Uuid::parse_str(parts[0]).unwrap_or_else(|_| Uuid::new_v4());
    let mut name = parts[2].trim().splitn(2, ' ');
    let first_name = name.next().filter(|n| !n.is_empty()).map(str::to_string);
    let last_name = name
        .next()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    Ok(AuthIdentity {
        id,
        email: Some(parts[1].to_string()),
        last_sign_in_at: None,
        first_name,
        last_name,
        invited: false,
    })
}

/// Local identity provider for development and tests. Codes and token
/// hashes are `user_id:email:name` strings. The access token it hands back is
/// an unsigned JWT, accepted by [`super::AuthService::new_dev_mode`] and safe
/// to store in a cookie as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct DevIdentityProvider;

impl DevIdentityProvider {
    fn session(identity: AuthIdentity) -> Result<AuthSession, IdentityError> {
        let expires_at = chrono::Utc::now().timestamp().max(0) as u64 + DEV_SESSION_SECONDS;
        let claims = SupabaseJwtClaims {
            sub: identity.id.to_string(),
            exp: expires_at,
            email: identity.email.clone(),
            user_metadata: Some(UserMetadataClaims {
                first_name: identity.first_name.clone(),
                last_name: identity.last_name.clone(),
            }),
        };
        let payload = serde_json::to_vec(&claims)
            .map_err(|e| IdentityError::MalformedCredential(e.to_string()))?;
        let access_token = format!(
            "{}.{}.",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        );

        Ok(AuthSession {
            access_token,
            expires_in: Some(DEV_SESSION_SECONDS),
            identity,
        })
    }
}

#[async_trait]
impl IdentityProvider for DevIdentityProvider {
    async fn exchange_code(
        &self,
        code: &str,
        _code_verifier: Option<&str>,
    ) -> Result<AuthSession, IdentityError> {
        let mut identity = parse_dev_identity(code)?;
        identity.last_sign_in_at = Some(chrono::Utc::now().to_rfc3339());
        tracing::debug!("Dev code exchange for {}", identity.id);
        Self::session(identity)
    }

    async fn verify_one_time_token(
        &self,
        token_hash: &str,
        kind: OtpKind,
    ) -> Result<AuthSession, IdentityError> {
        let mut identity = parse_dev_identity(token_hash)?;
        identity.invited = kind == OtpKind::Invite;
        if !matches!(kind, OtpKind::Signup | OtpKind::Invite) {
            identity.last_sign_in_at = Some(chrono::Utc::now().to_rfc3339());
        }
        tracing::debug!("Dev {} token verified for {}", kind, identity.id);
        Self::session(identity)
    }
}
