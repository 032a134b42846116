//! Signed session tokens.
//!
//! The sign-in service and this backend share a secret. A token is
//! `hex(email).expiry.hex(hmac_sha256(hex(email).expiry))`, with the expiry
//! in Unix seconds.

use axum::http::{header, HeaderMap};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "skidracek_session";

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    key: Vec<u8>,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    /// Issue a token for `email` valid for `ttl`. Tokens are minted by the
    /// sign-in service; this side only verifies them.
    #[cfg(test)]
    pub fn issue(&self, email: &str, ttl: std::time::Duration) -> Result<String, AppError> {
        let expires_at = Utc::now().timestamp() + ttl.as_secs() as i64;
        let payload = format!("{}.{}", hex::encode(email), expires_at);
        let signature = self.sign(&payload)?;
        Ok(format!("{}.{}", payload, signature))
    }

    /// Return the email inside a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Option<String> {
        let (payload, signature) = token.rsplit_once('.')?;
        let expected = self.sign(payload).ok()?;
        if !constant_time_compare(signature, &expected) {
            return None;
        }

        let (email_hex, expires_at) = payload.split_once('.')?;
        let expires_at: i64 = expires_at.parse().ok()?;
        if expires_at <= Utc::now().timestamp() {
            return None;
        }

        let email = String::from_utf8(hex::decode(email_hex).ok()?).ok()?;
        if email.is_empty() {
            return None;
        }
        Some(email)
    }

    fn sign(&self, payload: &str) -> Result<String, AppError> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| AppError::Internal(format!("Invalid session key: {}", e)))?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// Pull the session token from the cookie or a bearer header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.to_string())
    })
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    // Constant-time comparison
    a_bytes.ct_eq(b_bytes).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use axum::http::HeaderValue;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_issue_and_verify() {
        let keys = SessionKeys::new("test-secret");
        let token = keys.issue("admin@skidracek.cz", HOUR).unwrap();
        assert_eq!(keys.verify(&token).as_deref(), Some("admin@skidracek.cz"));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = SessionKeys::new("one").issue("a@b.cz", HOUR).unwrap();
        assert!(SessionKeys::new("two").verify(&token).is_none());
    }

    #[test]
    fn test_tampered_email_is_rejected() {
        let keys = SessionKeys::new("test-secret");
        let token = keys.issue("a@b.cz", HOUR).unwrap();
        let forged = token.replacen(&hex::encode("a@b.cz"), &hex::encode("x@b.cz"), 1);
        assert!(keys.verify(&forged).is_none());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = SessionKeys::new("test-secret");
        let payload = format!("{}.{}", hex::encode("a@b.cz"), Utc::now().timestamp() - 10);
        let token = format!("{}.{}", payload, keys.sign(&payload).unwrap());
        assert!(keys.verify(&token).is_none());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let keys = SessionKeys::new("test-secret");
        assert!(keys.verify("").is_none());
        assert!(keys.verify("no-dots").is_none());
        assert!(keys.verify("zz.1.abc").is_none());
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
        assert!(!constant_time_compare("test-key-123", "test-key-124"));
        assert!(!constant_time_compare("short", "much-longer-key"));
    }

    #[test]
    fn test_token_from_cookie_or_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; skidracek_session=abc.1.def"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.1.def"));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("tok"));

        assert!(token_from_headers(&HeaderMap::new()).is_none());
    }
}
