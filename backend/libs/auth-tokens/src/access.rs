//! Access token codec
//!
//! Access tokens are compact HS256 JWTs: three dot-separated base64url
//! segments (header, claims, signature). Claims carry the principal `id`,
//! an `expires` Unix timestamp, a random `jti`, and one `true` entry per
//! capability label.
//!
//! Tokens are stateless. Nothing server-side can revoke one before its
//! `expires` instant; integrators that need revocation layer it on top.
//!
//! ## Claims
//!
//! ```json
//! {"id": "user-42", "expires": 1700000900, "jti": "…", "admin": true}
//! ```

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::SigningConfig;
use crate::error::{SigningError, VerifyError};

/// HMAC using SHA-256
const ACCESS_TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Claim names that a capability label can never overwrite.
const RESERVED_CLAIMS: [&str; 3] = ["id", "expires", "jti"];

/// Decoded access token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Principal identity
    pub id: String,
    /// Expiration time (Unix timestamp)
    pub expires: i64,
    /// Unique token identifier
    pub jti: String,
    /// Capability claims, always `true` when present
    #[serde(flatten)]
    pub capabilities: BTreeMap<String, bool>,
}

impl AccessClaims {
    pub fn has_capability(&self, label: &str) -> bool {
        self.capabilities.get(label).copied().unwrap_or(false)
    }
}

/// Signed access token string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone)]
pub struct AccessTokenCodec {
    config: Arc<SigningConfig>,
    clock: Arc<dyn Clock>,
}

impl AccessTokenCodec {
    pub fn new(config: Arc<SigningConfig>, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Sign a new access token for `identity`.
    ///
    /// The identity and labels are not validated. Signing fails only when
    /// the access secret is missing or the expiry cannot be represented.
    pub fn generate<S: AsRef<str>>(
        &self,
        identity: &str,
        capabilities: &[S],
    ) -> Result<AccessToken, SigningError> {
        let secret = self.config.access_secret();
        if secret.is_empty() {
            return Err(SigningError::MissingSecret);
        }

        let minutes = self.config.access_lifetime_minutes();
        let expires = minutes
            .checked_mul(60)
            .and_then(|secs| self.clock.now().timestamp().checked_add(secs))
            .ok_or(SigningError::ExpiryOverflow { minutes })?;

        let claims = AccessClaims {
            id: identity.to_string(),
            expires,
            jti: Uuid::new_v4().to_string(),
            capabilities: capability_claims(capabilities),
        };

        let token = encode(
            &Header::new(ACCESS_TOKEN_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;

        debug!(
            identity,
            expires,
            capabilities = claims.capabilities.len(),
            "access token signed"
        );

        Ok(AccessToken(token))
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, VerifyError> {
        let secret = self.config.access_secret();
        if secret.is_empty() {
            return Err(VerifyError::MissingSecret);
        }

        // `expires` is not the registered `exp` claim, so check it here
        let mut validation = Validation::new(ACCESS_TOKEN_ALGORITHM);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;

        let data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;

        let expires = data.claims.expires;
        if expires < self.clock.now().timestamp() {
            return Err(VerifyError::Expired { expires });
        }

        Ok(data.claims)
    }
}

fn capability_claims<S: AsRef<str>>(capabilities: &[S]) -> BTreeMap<String, bool> {
    capabilities
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|label| {
            let reserved = RESERVED_CLAIMS.contains(label);
            if reserved {
                debug!(label, "skipping capability that shadows a reserved claim");
            }
            !reserved
        })
        .map(|label| (label.to_string(), true))
        .collect()
}
