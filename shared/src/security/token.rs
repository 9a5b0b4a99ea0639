//! 토큰 발급 및 검증
//!
//! Two token classes share one claim layout and differ only by lifetime and the
//! `kind` claim. Validity is derived purely from the signature and `exp`; the
//! server keeps no session table.

use crate::security::{SecurityConfig, SecurityError};
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: u64 = 15;
pub const DEFAULT_REFRESH_TOKEN_TTL_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT에 포함될 클레임 구조체
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// 사용자 고유 ID
    user_id: i64,
    kind: TokenKind,
    /// 발급 시간 (Unix timestamp, 초 단위)
    iat: i64,
    /// 만료 시간 (Unix timestamp, 초 단위)
    exp: i64,
}

/// Verified contents of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedToken {
    pub subject: i64,
    pub kind: TokenKind,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ParsedToken {
    pub fn expect_kind(&self, expected: TokenKind) -> Result<(), SecurityError> {
        if self.kind != expected {
            return Err(SecurityError::WrongTokenKind {
                expected,
                actual: self.kind,
            });
        }
        Ok(())
    }
}

/// Access/refresh pair issued for one event. Both tokens carry `subject` and the same `iat`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub subject: i64,
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies identity tokens with a single shared HMAC secret.
///
/// The secret is handed in once at construction and never changes afterwards.
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// # Errors
    /// `SigningFailure` when the secret is empty, the algorithm is not HMAC, or a
    /// lifetime is zero. All of these are startup configuration errors.
    pub fn new(config: &SecurityConfig) -> Result<Self, SecurityError> {
        if config.jwt_secret.is_empty() {
            return Err(SecurityError::SigningFailure(
                "signing secret is not configured".to_string(),
            ));
        }

        let algorithm = match config.jwt_algorithm.as_str() {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => {
                return Err(SecurityError::SigningFailure(format!(
                    "unsupported algorithm: {other}"
                )))
            }
        };

        if config.access_token_ttl.is_zero() || config.refresh_token_ttl.is_zero() {
            return Err(SecurityError::SigningFailure(
                "token lifetimes must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        })
    }

    pub fn lifetime(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    pub fn issue(&self, subject: i64, kind: TokenKind) -> Result<String, SecurityError> {
        self.issue_at(subject, kind, Utc::now())
    }

    /// Issues both tokens from a single timestamp. Either both succeed or the call fails.
    pub fn issue_pair(&self, subject: i64) -> Result<TokenPair, SecurityError> {
        self.issue_pair_at(subject, Utc::now())
    }

    pub fn parse(&self, token: &str) -> Result<ParsedToken, SecurityError> {
        self.parse_at(token, Utc::now())
    }

    /// Parses a token that must be an access token (API authorization).
    pub fn parse_access(&self, token: &str) -> Result<ParsedToken, SecurityError> {
        let parsed = self.parse(token)?;
        parsed.expect_kind(TokenKind::Access)?;
        Ok(parsed)
    }

    /// Exchanges a valid refresh token for a new pair with the same subject.
    ///
    /// The presented refresh token is not revoked; it stays usable until it expires.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, SecurityError> {
        let parsed = self.parse(refresh_token)?;
        parsed.expect_kind(TokenKind::Refresh)?;
        self.issue_pair(parsed.subject)
    }

    fn issue_at(
        &self,
        subject: i64,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
    ) -> Result<String, SecurityError> {
        let ttl = chrono::Duration::from_std(self.lifetime(kind))
            .map_err(|e| SecurityError::SigningFailure(format!("token lifetime: {e}")))?;
        let expires_at = issued_at + ttl;

        tracing::debug!(
            user_id = subject,
            kind = %kind,
            expires_at = %expires_at,
            "🔑 issuing token"
        );

        let claims = Claims {
            user_id: subject,
            kind,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| SecurityError::SigningFailure(e.to_string()))
    }

    fn issue_pair_at(
        &self,
        subject: i64,
        issued_at: DateTime<Utc>,
    ) -> Result<TokenPair, SecurityError> {
        let access_token = self.issue_at(subject, TokenKind::Access, issued_at)?;
        let refresh_token = self.issue_at(subject, TokenKind::Refresh, issued_at)?;
        Ok(TokenPair {
            subject,
            access_token,
            refresh_token,
        })
    }

    fn parse_at(&self, token: &str, now: DateTime<Utc>) -> Result<ParsedToken, SecurityError> {
        // Expiry is decided on the decoded claims before the signature is checked,
        // so a past `exp` is reported as Expired whoever signed it.
        let mut unverified = Validation::new(self.algorithm);
        unverified.insecure_disable_signature_validation();
        unverified.validate_exp = false;

        let claims = decode::<Claims>(token, &self.decoding_key, &unverified)
            .map_err(|_| SecurityError::MalformedToken)?
            .claims;

        if claims.exp <= now.timestamp() {
            return Err(SecurityError::Expired);
        }

        let mut verified = Validation::new(self.algorithm);
        verified.validate_exp = false;

        decode::<Claims>(token, &self.decoding_key, &verified).map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                SecurityError::InvalidSignature
            }
            _ => SecurityError::MalformedToken,
        })?;

        let issued_at =
            DateTime::from_timestamp(claims.iat, 0).ok_or(SecurityError::MalformedToken)?;
        let expires_at =
            DateTime::from_timestamp(claims.exp, 0).ok_or(SecurityError::MalformedToken)?;

        Ok(ParsedToken {
            subject: claims.user_id,
            kind: claims.kind,
            issued_at,
            expires_at,
        })
    }
}
