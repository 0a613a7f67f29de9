//! Signed bearer tokens for the session store (spec §4.3).
//!
//! Unlike a classic JWT-based auth scheme, the payload here is reduced to an
//! opaque pointer at a server-side `Session`/`SessionToken` row — every other
//! fact about the caller (user, tenant, role, loginType) is looked up from
//! that row on every request, never trusted from the token itself. Signing
//! mechanism (HMAC-SHA, via `jsonwebtoken`'s HS256) is unchanged from the
//! JWT convention this crate generalizes.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared_error::AppError;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    pub session_id: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub token_type: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshClaims {
    pub session_id: Uuid,
    /// Points at the `SessionToken` row representing this specific refresh
    /// token in the chain; used to detect reuse (spec §4.3 replay rule).
    pub refresh_token_id: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub token_type: String,
}

fn encoding_key(secret: &str) -> EncodingKey {
    EncodingKey::from_secret(secret.as_bytes())
}

fn decoding_key(secret: &str) -> DecodingKey {
    DecodingKey::from_secret(secret.as_bytes())
}

pub fn encode_access_token(
    session_id: Uuid,
    ttl_seconds: i64,
    secret: &str,
) -> Result<String, AppError> {
    let now = chrono::Utc::now().timestamp();
    let claims = AccessClaims {
        session_id,
        iat: now,
        exp: now + ttl_seconds,
        token_type: "access".to_string(),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &encoding_key(secret))
        .map_err(|e| AppError::server("server.internal.tokenEncode", e))
}

pub fn decode_access_token(token: &str, secret: &str) -> Result<AccessClaims, AppError> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<AccessClaims>(token, &decoding_key(secret), &validation)
        .map_err(|_| AppError::unauthorized("session.token.invalid"))?;
    if data.claims.token_type != "access" {
        return Err(AppError::unauthorized("session.token.wrongType"));
    }
    Ok(data.claims)
}

pub fn encode_refresh_token(
    session_id: Uuid,
    refresh_token_id: Uuid,
    ttl_seconds: i64,
    secret: &str,
) -> Result<String, AppError> {
    let now = chrono::Utc::now().timestamp();
    let claims = RefreshClaims {
        session_id,
        refresh_token_id,
        iat: now,
        exp: now + ttl_seconds,
        token_type: "refresh".to_string(),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &encoding_key(secret))
        .map_err(|e| AppError::server("server.internal.tokenEncode", e))
}

pub fn decode_refresh_token(token: &str, secret: &str) -> Result<RefreshClaims, AppError> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<RefreshClaims>(token, &decoding_key(secret), &validation)
        .map_err(|_| AppError::unauthorized("session.token.invalid"))?;
    if data.claims.token_type != "refresh" {
        return Err(AppError::unauthorized("session.token.wrongType"));
    }
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_round_trips() {
        let session_id = Uuid::new_v4();
        let token = encode_access_token(session_id, 900, "secret").unwrap();
        let claims = decode_access_token(&token, "secret").unwrap();
        assert_eq!(claims.session_id, session_id);
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn refresh_token_round_trips() {
        let session_id = Uuid::new_v4();
        let refresh_id = Uuid::new_v4();
        let token = encode_refresh_token(session_id, refresh_id, 3600, "secret").unwrap();
        let claims = decode_refresh_token(&token, "secret").unwrap();
        assert_eq!(claims.session_id, session_id);
        assert_eq!(claims.refresh_token_id, refresh_id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = encode_access_token(Uuid::new_v4(), 900, "secret").unwrap();
        assert!(decode_access_token(&token, "other-secret").is_err());
    }

    #[test]
    fn access_token_rejected_as_refresh() {
        let token = encode_access_token(Uuid::new_v4(), 900, "secret").unwrap();
        assert!(decode_refresh_token(&token, "secret").is_err());
    }
}
