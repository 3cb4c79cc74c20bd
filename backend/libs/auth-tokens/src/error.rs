//! Error types for token issuance, parsing and verification.
//!
//! Every failure is returned as a value. Nothing here is retried internally;
//! retry policy belongs to the caller.

use thiserror::Error;

/// Access token signature could not be produced.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("access token secret is not configured")]
    MissingSecret,

    #[error("access token expiry overflows for lifetime of {minutes} minutes")]
    ExpiryOverflow { minutes: i64 },

    #[error("failed to sign access token: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// Refresh token digest could not be produced.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("refresh token secret is not configured")]
    MissingSecret,

    #[error("refresh token expiry overflows for lifetime of {hours} hours")]
    ExpiryOverflow { hours: i64 },
}

/// Refresh token is malformed or carries a non-numeric expiry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("refresh token has no '.' separator")]
    MissingSeparator,

    #[error("refresh token expiry segment is empty")]
    EmptyExpiry,

    #[error("refresh token expiry is not an integer: {0}")]
    InvalidExpiry(#[from] std::num::ParseIntError),
}

/// Combined issuance failed; no partial token pair is returned.
#[derive(Debug, Error)]
pub enum IssuanceError {
    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Access token failed verification.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("access token secret is not configured")]
    MissingSecret,

    #[error("invalid access token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("access token expired at {expires}")]
    Expired { expires: i64 },
}

/// Signing configuration could not be loaded or is out of range.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read signing configuration from environment: {0}")]
    Env(#[from] envy::Error),

    #[error("missing configuration value: {0}")]
    Missing(&'static str),

    #[error("invalid signing configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}
