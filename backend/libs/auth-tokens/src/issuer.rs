//! Token pair issuance

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::access::{AccessToken, AccessTokenCodec};
use crate::clock::{Clock, SystemClock};
use crate::config::SigningConfig;
use crate::error::IssuanceError;
use crate::refresh::{RefreshToken, RefreshTokenCodec};

const TOKEN_TYPE: &str = "Bearer";

/// Token pair response structure
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Issues access/refresh token pairs. Cheap to clone and safe to share.
#[derive(Clone)]
pub struct TokenIssuer {
    access: AccessTokenCodec,
    refresh: RefreshTokenCodec,
    expires_in: i64,
}

impl TokenIssuer {
    pub fn new(config: Arc<SigningConfig>, clock: Arc<dyn Clock>) -> Self {
        let expires_in = config.access_lifetime_minutes().saturating_mul(60);

        Self {
            access: AccessTokenCodec::new(config.clone(), clock.clone()),
            refresh: RefreshTokenCodec::new(config, clock),
            expires_in,
        }
    }

    pub fn with_system_clock(config: Arc<SigningConfig>) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    /// Issue an access token, then a refresh token. Either both or neither.
    pub fn issue<S: AsRef<str>>(
        &self,
        identity: &str,
        capabilities: &[S],
    ) -> Result<TokenPair, IssuanceError> {
        let pair = self.try_issue(identity, capabilities);

        match &pair {
            Ok(_) => info!(
                identity,
                capabilities = capabilities.len(),
                "token pair issued"
            ),
            Err(e) => error!(identity, error = %e, "token issuance failed"),
        }

        pair
    }

    fn try_issue<S: AsRef<str>>(
        &self,
        identity: &str,
        capabilities: &[S],
    ) -> Result<TokenPair, IssuanceError> {
        let access_token = self.access.generate(identity, capabilities)?;
        let refresh_token = self.refresh.generate()?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE,
            expires_in: self.expires_in,
        })
    }

    pub fn access_codec(&self) -> &AccessTokenCodec {
        &self.access
    }

    pub fn refresh_codec(&self) -> &RefreshTokenCodec {
        &self.refresh
    }
}
