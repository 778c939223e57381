//! JWT access-token generation and validation.
//!
//! Tokens are HS256-signed JWTs containing a [`Claims`] payload. There is no
//! server-side session store: a token stays valid until it expires.

use fyparchive_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default token lifetime: 7 days.
pub const DEFAULT_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;

/// Longest accepted token lifetime: 365 days.
pub const MAX_EXPIRY_SECS: i64 = 365 * 24 * 60 * 60;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the admin's internal database id.
    pub sub: DbId,
    pub email: String,
    /// The admin's role name (e.g. `"admin"`, `"superadmin"`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for audit.
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in seconds.
    pub expiry_secs: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiry_secs", &self.expiry_secs)
            .finish()
    }
}

/// Parse a token lifetime such as `7d`, `12h`, `30m`, `45s`, or a bare
/// number of seconds. Returns `None` for zero, negative, malformed, or
/// longer-than-[`MAX_EXPIRY_SECS`] input.
pub fn parse_expiry(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (digits, multiplier) = match raw.char_indices().last()? {
        (i, 'd') => (&raw[..i], 24 * 60 * 60),
        (i, 'h') => (&raw[..i], 60 * 60),
        (i, 'm') => (&raw[..i], 60),
        (i, 's') => (&raw[..i], 1),
        _ => (raw, 1),
    };
    let value: i64 = digits.trim().parse().ok()?;
    if value <= 0 {
        return None;
    }
    value
        .checked_mul(multiplier)
        .filter(|secs| *secs <= MAX_EXPIRY_SECS)
}

/// Generate an HS256 access token for the given admin.
pub fn generate_access_token(
    admin_id: DbId,
    email: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: admin_id,
        email: email.to_string(),
        role: role.to_string(),
        exp: now.saturating_add(config.expiry_secs),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}
