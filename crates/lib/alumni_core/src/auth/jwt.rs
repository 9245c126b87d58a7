//! Signed access tokens (HS256, 24 hour lifetime).

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;

/// Access token lifetime: 24 hours.
pub const ACCESS_TOKEN_EXPIRY_SECS: i64 = 24 * 60 * 60;

/// Minimum accepted secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Issuer written to and required on every token.
pub const TOKEN_ISSUER: &str = "alumni-api";

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Alumni id.
    pub sub: Uuid,
    pub email: String,
    /// Role name (`admin` or `user`).
    pub role: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
}

impl TokenClaims {
    /// Claims for a freshly issued token.
    pub fn new(alumni_id: Uuid, email: &str, role: &str) -> Self {
        let now = Utc::now();
        Self {
            sub: alumni_id,
            email: email.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + Duration::seconds(ACCESS_TOKEN_EXPIRY_SECS)).timestamp(),
            iss: TOKEN_ISSUER.to_string(),
        }
    }
}

/// Issues and verifies access tokens with a single HMAC secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    /// Build a token service. Secrets shorter than 32 bytes are rejected.
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::ConfigError(format!(
                "JWT secret must be at least {MIN_SECRET_LEN} characters"
            )));
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Issue a token for the given alumni.
    pub fn issue(&self, alumni_id: Uuid, email: &str, role: &str) -> Result<String, AuthError> {
        self.sign(&TokenClaims::new(alumni_id, email, role))
    }

    /// Sign arbitrary claims with HS256.
    pub fn sign(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))
    }

    /// Verify a token, returning its claims.
    ///
    /// Rejects bad signatures, any algorithm other than HS256, expired or
    /// not-yet-valid tokens and tokens from another issuer.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }
}
