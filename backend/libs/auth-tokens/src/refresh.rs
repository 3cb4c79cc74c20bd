//! Refresh token codec
//!
//! Wire format: `<64 hex chars>.<decimal unix timestamp>`. The digest is
//! SHA-256 over the refresh secret followed by the issuance instant; the
//! suffix is the plaintext expiry.
//!
//! The digest is not bound to a principal and is never checked on the way
//! back in. Holding a well-formed token with an unexpired suffix is what
//! makes it usable.

use std::sync::Arc;

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::clock::Clock;
use crate::config::SigningConfig;
use crate::error::{HashError, ParseError};

const SEPARATOR: char = '.';

/// Opaque refresh token string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(String);

impl RefreshToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Embedded expiry (Unix timestamp).
    pub fn expiry(&self) -> Result<i64, ParseError> {
        RefreshTokenCodec::extract_expiry(&self.0)
    }
}

impl std::fmt::Display for RefreshToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone)]
pub struct RefreshTokenCodec {
    config: Arc<SigningConfig>,
    clock: Arc<dyn Clock>,
}

impl RefreshTokenCodec {
    pub fn new(config: Arc<SigningConfig>, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn generate(&self) -> Result<RefreshToken, HashError> {
        let secret = self.config.refresh_secret();
        if secret.is_empty() {
            return Err(HashError::MissingSecret);
        }

        let now = self.clock.now();
        let hours = self.config.refresh_lifetime_hours();
        let expires = hours
            .checked_mul(3600)
            .and_then(|secs| now.timestamp().checked_add(secs))
            .ok_or(HashError::ExpiryOverflow { hours })?;

        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hasher.update(now.to_rfc3339_opts(SecondsFormat::Nanos, true).as_bytes());
        let digest = hex::encode(hasher.finalize());

        debug!(expires, "refresh token generated");

        Ok(RefreshToken(format!("{digest}{SEPARATOR}{expires}")))
    }

    /// Parse the expiry suffix. The digest segment is not inspected.
    ///
    /// Comparing the result against the current time is left to the caller.
    pub fn extract_expiry(token: &str) -> Result<i64, ParseError> {
        let expiry = token
            .split(SEPARATOR)
            .nth(1)
            .ok_or(ParseError::MissingSeparator)?;

        if expiry.is_empty() {
            return Err(ParseError::EmptyExpiry);
        }

        Ok(expiry.parse::<i64>()?)
    }
}
