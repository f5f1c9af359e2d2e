use base64::Engine;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use board_types::AuthIdentity;

use super::dev::parse_dev_identity;

/// Audience Supabase stamps on tokens issued to signed-in users
pub const SUPABASE_AUDIENCE: &str = "authenticated";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadataClaims {
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseJwtClaims {
    pub sub: String, // Supabase user id
    #[serde(default)]
    pub exp: u64,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Option<UserMetadataClaims>,
}

impl SupabaseJwtClaims {
    fn into_identity(self) -> Result<AuthIdentity, AuthError> {
        let id = uuid::Uuid::parse_str(&self.sub).map_err(|_| {
            tracing::warn!("Token subject is not a user id: {}", self.sub);
            AuthError::InvalidToken
        })?;
        let metadata = self.user_metadata.unwrap_or_default();

        Ok(AuthIdentity {
            id,
            email: self.email,
            last_sign_in_at: None,
            first_name: metadata.first_name,
            last_name: metadata.last_name,
            invited: false,
        })
    }
}

/// Validates the session tokens sent with API requests.
///
/// Production tokens are HS256 JWTs signed with the project's JWT secret. In
/// dev mode tokens are decoded without any signature check.
pub struct AuthService {
    decoding_key: Option<DecodingKey>,
    dev_mode: bool,
}

impl AuthService {
    pub fn new(jwt_secret: String) -> Self {
        Self {
            decoding_key: Some(DecodingKey::from_secret(jwt_secret.as_bytes())),
            dev_mode: false,
        }
    }

    pub fn new_dev_mode() -> Self {
        Self {
            decoding_key: None,
            dev_mode: true,
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthIdentity, AuthError> {
        let key = match (&self.decoding_key, self.dev_mode) {
            (Some(key), false) => key,
            _ => return self.validate_dev_token(token),
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[SUPABASE_AUDIENCE]);

        let token_data = decode::<SupabaseJwtClaims>(token, key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::warn!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidAudience => {
                    tracing::warn!("Token audience mismatch");
                    AuthError::AudienceMismatch
                }
                _ => {
                    tracing::warn!("JWT token validation failed: {:?}", e);
                    AuthError::InvalidToken
                }
            }
        })?;

        token_data.claims.into_identity()
    }

    fn validate_dev_token(&self, token: &str) -> Result<AuthIdentity, AuthError> {
        tracing::debug!(
            "Validating dev token (first 20 chars): {}",
            token.chars().take(20).collect::<String>()
        );

        // JWT-shaped tokens: read the payload, skip the signature
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() == 3 {
            let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
                .decode(parts[1].trim_end_matches('='))
                .map_err(|e| {
                    tracing::warn!("Failed to decode JWT payload in dev mode: {:?}", e);
                    AuthError::InvalidToken
                })?;

            let claims: SupabaseJwtClaims = serde_json::from_slice(&payload).map_err(|e| {
                tracing::warn!("Failed to parse JWT claims in dev mode: {:?}", e);
                AuthError::InvalidToken
            })?;
            return claims.into_identity();
        }

        // Simple string format: "user_id:email:name"
        parse_dev_identity(token).map_err(|_| AuthError::InvalidToken)
    }
}

/// Pull the session token from an `Authorization: Bearer` header, falling
/// back to the session cookie.
pub fn session_token(authorization: Option<String>, cookie: Option<String>) -> Option<String> {
    match authorization {
        Some(header) => {
            let token = header
                .strip_prefix("Bearer ")
                .map(str::to_string)
                .unwrap_or(header);
            Some(token.trim().to_string()).filter(|t| !t.is_empty())
        }
        None => cookie.filter(|c| !c.is_empty()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Audience mismatch")]
    AudienceMismatch,
}
