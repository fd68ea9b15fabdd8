//! Signed session tokens.
//!
//! Sessions are HS256 JWTs carried in an HttpOnly cookie. There is no
//! server-side session store and no revocation list: validity is entirely
//! determined by the signature and expiry at request time, so logout is a
//! client-side cookie deletion and a stolen token stays valid until its
//! natural expiry.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;

/// Errors from session issuance and verification.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session token expired")]
    Expired,

    #[error("invalid session token")]
    Invalid,

    #[error("session token encoding failed: {0}")]
    Encoding(String),
}

/// Claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Authenticated identity (admin username or mobile phone number).
    pub sub: String,

    /// Role as stored in the user sheet (e.g., "admin", "member").
    pub role: String,

    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,

    /// Expiry (Unix timestamp, seconds).
    pub exp: i64,
}

/// Issues and verifies session tokens for a fixed secret and TTL.
#[derive(Clone)]
pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    cookie_name: String,
}

impl SessionSigner {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::hours(config.ttl_hours),
            cookie_name: config.cookie_name.clone(),
        }
    }

    /// Issue a signed token for an authenticated identity.
    pub fn issue(&self, sub: &str, role: &str) -> Result<String, SessionError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: sub.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| SessionError::Encoding(e.to_string()))
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::Invalid,
            })
    }

    /// `Set-Cookie` value carrying the token.
    pub fn cookie(&self, token: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.cookie_name,
            token,
            self.ttl.num_seconds()
        )
    }

    /// `Set-Cookie` value that clears the session cookie.
    pub fn clear_cookie(&self) -> String {
        format!("{}=; Path=/; HttpOnly; Max-Age=0", self.cookie_name)
    }

    /// Extract the session token from a `Cookie` request header.
    pub fn token_from_cookies<'a>(&self, cookie_header: &'a str) -> Option<&'a str> {
        cookie_header.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            if name == self.cookie_name {
                Some(value)
            } else {
                None
            }
        })
    }
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSigner")
            .field("ttl", &self.ttl)
            .field("cookie_name", &self.cookie_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> SessionSigner {
        SessionSigner::new(&SessionConfig {
            secret: "unit-test-secret".to_string(),
            ttl_hours: 24,
            cookie_name: "feeflow_session".to_string(),
        })
    }

    #[test]
    fn test_issue_and_verify() {
        let signer = signer();
        let token = signer.issue("headmaster", "admin").unwrap();
        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, "headmaster");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = signer();
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "headmaster".to_string(),
            role: "admin".to_string(),
            iat: now - 25 * 3600,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();
        assert!(matches!(signer.verify(&token), Err(SessionError::Expired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = signer();
        let other = SessionSigner::new(&SessionConfig {
            secret: "different-secret".to_string(),
            ttl_hours: 24,
            cookie_name: "feeflow_session".to_string(),
        });
        let token = other.issue("headmaster", "admin").unwrap();
        assert!(matches!(signer.verify(&token), Err(SessionError::Invalid)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            signer().verify("not-a-token"),
            Err(SessionError::Invalid)
        ));
    }

    #[test]
    fn test_cookie_extraction() {
        let signer = signer();
        let header = "theme=dark; feeflow_session=abc.def.ghi; lang=en";
        assert_eq!(signer.token_from_cookies(header), Some("abc.def.ghi"));
        assert_eq!(signer.token_from_cookies("theme=dark"), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let signer = signer();
        let cookie = signer.cookie("tok");
        assert!(cookie.starts_with("feeflow_session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(signer.clear_cookie().contains("Max-Age=0"));
    }
}
