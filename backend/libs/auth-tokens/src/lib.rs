//! Access and refresh token issuance for Nova services
//!
//! - **Access tokens**: HS256-signed, self-contained, short-lived. Carry the
//!   principal id, an `expires` timestamp and boolean capability claims.
//! - **Refresh tokens**: opaque `<sha256 hex>.<expiry>` strings, long-lived.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use auth_tokens::{SigningConfig, TokenIssuer, RefreshTokenCodec};
//!
//! let config = SigningConfig::from_env()?;
//! let issuer = TokenIssuer::with_system_clock(Arc::new(config));
//!
//! let pair = issuer.issue("user-42", &["admin"])?;
//! let refresh_expires = RefreshTokenCodec::extract_expiry(pair.refresh_token.as_str())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod access;
pub mod clock;
pub mod config;
pub mod error;
pub mod issuer;
pub mod refresh;
pub mod secret_validation;

pub use access::{AccessClaims, AccessToken, AccessTokenCodec};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::SigningConfig;
pub use error::{ConfigError, HashError, IssuanceError, ParseError, SigningError, VerifyError};
pub use issuer::{TokenIssuer, TokenPair};
pub use refresh::{RefreshToken, RefreshTokenCodec};
pub use secret_validation::{validate_secret_strength, SecretStrength};
