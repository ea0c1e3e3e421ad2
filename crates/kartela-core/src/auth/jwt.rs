use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::KartelaError;

const BADGE_KIND: &str = "badge";
const SESSION_KIND: &str = "room";

/// Claims of the short-lived ticket issued after a successful badge scan.
///
/// The room step only trusts a user id carried in a ticket signed here.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BadgeClaims {
    /// Subject (user ID)
    pub sub: String,
    pub kind: String,
    pub exp: usize,
    pub iat: usize,
}

/// Claims of a room session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Unique token id; makes every issued token (and its hash) distinct
    pub jti: String,
    pub kind: String,
    pub room_id: i32,
    pub room_code: String,
    pub user_name: String,
    pub room_name: String,
    pub exp: usize,
    pub iat: usize,
}

impl SessionClaims {
    pub fn new(
        user_id: i32,
        user_name: &str,
        room_id: i32,
        room_code: &str,
        room_name: &str,
        issued_at: DateTime<Utc>,
        ttl_hours: u64,
    ) -> Self {
        let expires = issued_at + Duration::hours(ttl_hours as i64);
        SessionClaims {
            sub: user_id.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            kind: SESSION_KIND.to_string(),
            room_id,
            room_code: room_code.to_string(),
            user_name: user_name.to_string(),
            room_name: room_name.to_string(),
            exp: expires.timestamp() as usize,
            iat: issued_at.timestamp() as usize,
        }
    }

    pub fn user_id(&self) -> Result<i32, KartelaError> {
        self.sub
            .parse()
            .map_err(|_| KartelaError::SessionRequired("Invalid user ID in session".to_string()))
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp as i64, 0).unwrap_or_default()
    }
}

fn validation() -> Validation {
    let mut validation = Validation::default();
    validation.leeway = 0;
    validation
}

/// Sign any claims with the service secret.
pub fn encode_claims<T: Serialize>(claims: &T, secret: &str) -> Result<String, KartelaError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| KartelaError::Internal(format!("Failed to create token: {}", e)))
}

/// Issue a badge ticket for `user_id`, valid for `ttl_secs`.
pub fn create_badge_ticket(
    user_id: i32,
    secret: &str,
    ttl_secs: u64,
) -> Result<String, KartelaError> {
    let now = Utc::now();
    let claims = BadgeClaims {
        sub: user_id.to_string(),
        kind: BADGE_KIND.to_string(),
        exp: (now + Duration::seconds(ttl_secs as i64)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode_claims(&claims, secret)
}

/// Validate a badge ticket and return the user id it was issued for.
pub fn validate_badge_ticket(token: &str, secret: &str) -> Result<i32, KartelaError> {
    let claims = decode::<BadgeClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation(),
    )
    .map_err(|e| KartelaError::Unauthorized(format!("Invalid badge ticket: {}", e)))?
    .claims;

    if claims.kind != BADGE_KIND {
        return Err(KartelaError::Unauthorized(
            "Token is not a badge ticket".to_string(),
        ));
    }

    claims
        .sub
        .parse()
        .map_err(|_| KartelaError::Unauthorized("Invalid user ID in badge ticket".to_string()))
}

/// Validate a room session token and return its claims.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, KartelaError> {
    let claims = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            KartelaError::SessionRequired("Session has expired".to_string())
        }
        _ => KartelaError::SessionRequired(format!("Invalid session token: {}", e)),
    })?
    .claims;

    if claims.kind != SESSION_KIND {
        return Err(KartelaError::SessionRequired(
            "Token is not a room session".to_string(),
        ));
    }

    Ok(claims)
}
