//! Session tokens and password hashing.
//!
//! The auth provider the rest of the crate consumes: handlers only ever need
//! "who is the current user" and "is this password right". Sessions are
//! short-lived HS256 JWTs carrying the user id and email; passwords are
//! stored as PBKDF2-HMAC-SHA256 in the format
//! `pbkdf2:iterations:hex_salt:hex_hash`.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::errors::Result;

const PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = 32;

/// Claims carried by a session token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id the session belongs to
    pub sub: i32,
    /// Email at login time
    pub email: String,
    /// Issued-at unix seconds
    pub iat: i64,
    /// Expiration unix seconds
    pub exp: i64,
}

/// Hashes a password with a fresh random salt.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut hash);

    format!(
        "pbkdf2:{PBKDF2_ITERATIONS}:{}:{}",
        hex::encode(salt),
        hex::encode(hash)
    )
}

/// Checks a password against a stored `pbkdf2:iterations:hex_salt:hex_hash`
/// string. Malformed stored values verify as false rather than erroring -
/// they can only mean the row predates this scheme.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split(':');
    let (Some("pbkdf2"), Some(iterations), Some(salt_hex), Some(hash_hex)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    let (Ok(iterations), Ok(salt), Ok(expected)) = (
        iterations.parse::<u32>(),
        hex::decode(salt_hex),
        hex::decode(hash_hex),
    ) else {
        return false;
    };

    let mut actual = vec![0u8; expected.len()];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut actual);

    constant_time_eq(&actual, &expected)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Issues a session token for a user.
pub fn issue_session(secret: &str, ttl_minutes: i64, user_id: i32, email: &str) -> Result<String> {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: user_id,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(ttl_minutes.max(1))).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(Into::into)
}

/// Verifies a session token, returning its claims. Expired or tampered
/// tokens fail here and surface as `Unauthenticated` at the API boundary.
pub fn verify_session(secret: &str, token: &str) -> Result<SessionClaims> {
    let data = jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_hash_password_format_and_uniqueness() {
        let first = hash_password("hunter2");
        let second = hash_password("hunter2");

        assert!(first.starts_with("pbkdf2:100000:"));
        // Fresh salt per hash
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_password_round_trip() {
        let stored = hash_password("contraseña-segura");
        assert!(verify_password("contraseña-segura", &stored));
        assert!(!verify_password("otra-cosa", &stored));
    }

    #[test]
    fn test_verify_password_malformed_stored_value() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "bcrypt:whatever"));
        assert!(!verify_password("x", "pbkdf2:abc:zz:zz"));
    }

    #[test]
    fn test_session_round_trip() {
        let token = issue_session("test-secret", 10, 7, "ana@example.com").unwrap();
        let claims = verify_session("test-secret", &token).unwrap();

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.email, "ana@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_session_wrong_secret_rejected() {
        let token = issue_session("test-secret", 10, 7, "ana@example.com").unwrap();
        assert!(verify_session("another-secret", &token).is_err());
    }
}
