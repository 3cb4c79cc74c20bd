//! Signing configuration
//!
//! Holds the access secret and lifetime (minutes) and the refresh secret and
//! lifetime (hours). Built once at startup and shared read-only, usually as
//! `Arc<SigningConfig>`.
//!
//! ## Environment
//!
//! - `ACCESS_TOKEN_SECRET`
//! - `ACCESS_TOKEN_LIFETIME_MINUTES`
//! - `REFRESH_TOKEN_SECRET`
//! - `REFRESH_TOKEN_LIFETIME_HOURS`
//!
//! A missing secret is accepted here and reported when a token is generated.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::warn;
use validator::Validate;

use crate::error::ConfigError;
use crate::secret_validation::{validate_secret_strength, SecretStrength};

#[derive(Debug, Validate)]
pub struct SigningConfig {
    access_secret: SecretString,

    #[validate(range(min = 1))]
    access_lifetime_minutes: i64,

    refresh_secret: SecretString,

    #[validate(range(min = 1))]
    refresh_lifetime_hours: i64,
}

/// Raw environment shape; envy maps `ACCESS_TOKEN_SECRET` to `access_token_secret`.
#[derive(Deserialize)]
struct EnvSigningConfig {
    access_token_secret: Option<String>,
    access_token_lifetime_minutes: Option<i64>,
    refresh_token_secret: Option<String>,
    refresh_token_lifetime_hours: Option<i64>,
}

impl SigningConfig {
    pub fn new(
        access_secret: impl Into<String>,
        access_lifetime_minutes: i64,
        refresh_secret: impl Into<String>,
        refresh_lifetime_hours: i64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            access_secret: SecretString::from(access_secret.into()),
            access_lifetime_minutes,
            refresh_secret: SecretString::from(refresh_secret.into()),
            refresh_lifetime_hours,
        };
        config.validate()?;

        warn_if_weak("access", config.access_secret());
        warn_if_weak("refresh", config.refresh_secret());

        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let raw: EnvSigningConfig = envy::from_env()?;

        let access_lifetime_minutes = raw
            .access_token_lifetime_minutes
            .ok_or(ConfigError::Missing("ACCESS_TOKEN_LIFETIME_MINUTES"))?;
        let refresh_lifetime_hours = raw
            .refresh_token_lifetime_hours
            .ok_or(ConfigError::Missing("REFRESH_TOKEN_LIFETIME_HOURS"))?;

        Self::new(
            raw.access_token_secret.unwrap_or_default(),
            access_lifetime_minutes,
            raw.refresh_token_secret.unwrap_or_default(),
            refresh_lifetime_hours,
        )
    }

    pub fn access_secret(&self) -> &str {
        self.access_secret.expose_secret()
    }

    pub fn access_lifetime_minutes(&self) -> i64 {
        self.access_lifetime_minutes
    }

    pub fn refresh_secret(&self) -> &str {
        self.refresh_secret.expose_secret()
    }

    pub fn refresh_lifetime_hours(&self) -> i64 {
        self.refresh_lifetime_hours
    }
}

fn warn_if_weak(kind: &'static str, secret: &str) {
    if secret.is_empty() {
        warn!(kind, "token secret is not configured; issuance will fail");
        return;
    }

    if validate_secret_strength(secret) == SecretStrength::Weak {
        warn!(kind, "token secret is weak; use at least 32 random bytes");
    }
}
