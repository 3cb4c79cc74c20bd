/// Integration tests for token pair issuance
///
/// This test module covers:
/// - End-to-end issuance with a fixed clock
/// - Access token signature verification with independent decoding
/// - Refresh token expiry extraction
/// - Error handling for malformed refresh tokens and missing secrets
use std::collections::HashSet;
use std::sync::Arc;

use auth_tokens::{
    FixedClock, IssuanceError, ParseError, RefreshTokenCodec, SigningConfig, SystemClock,
    TokenIssuer,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::Value;

const ACCESS_SECRET: &str = "integration-access-secret-with-enough-bytes";
const REFRESH_SECRET: &str = "integration-refresh-secret-with-enough-bytes";
const T0: i64 = 1_700_000_000;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("auth_tokens=debug")
        .try_init();
}

fn config(access_minutes: i64, refresh_hours: i64) -> Arc<SigningConfig> {
    Arc::new(
        SigningConfig::new(ACCESS_SECRET, access_minutes, REFRESH_SECRET, refresh_hours)
            .expect("valid config"),
    )
}

fn fixed_issuer(access_minutes: i64, refresh_hours: i64) -> TokenIssuer {
    TokenIssuer::new(
        config(access_minutes, refresh_hours),
        Arc::new(FixedClock::at_timestamp(T0).expect("valid timestamp")),
    )
}

/// Decode claims without going through the crate's own verifier.
fn decode_claims(token: &str, secret: &str) -> jsonwebtoken::errors::Result<Value> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims = HashSet::new();
    validation.validate_exp = false;

    decode::<Value>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_issue_user_42_admin() {
    init_tracing();

    let pair = fixed_issuer(15, 24)
        .issue("user-42", &["admin"])
        .expect("issuance should succeed");

    let claims = decode_claims(pair.access_token.as_str(), ACCESS_SECRET).unwrap();
    assert_eq!(claims["id"], "user-42");
    assert_eq!(claims["admin"], true);
    assert_eq!(claims["expires"], T0 + 15 * 60);

    let (digest, expiry) = pair
        .refresh_token
        .as_str()
        .split_once('.')
        .expect("refresh token has a separator");
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(expiry.parse::<i64>().unwrap(), T0 + 24 * 3600);
}

// ============================================================================
// Access token
// ============================================================================

#[test]
fn test_access_token_verifies_only_with_configured_secret() {
    let issuer = fixed_issuer(15, 24);

    for (identity, capabilities) in [
        ("user-1", vec![]),
        ("user-2", vec!["read"]),
        ("", vec!["read", "write", "admin"]),
        ("名前", vec!["ünïcode"]),
    ] {
        let pair = issuer.issue(identity, capabilities.as_slice()).unwrap();
        let token = pair.access_token.as_str();

        let claims = decode_claims(token, ACCESS_SECRET).expect("valid signature");
        assert_eq!(claims["id"], identity);

        assert!(decode_claims(token, "some-other-secret").is_err());
        assert!(decode_claims(token, "").is_err());
    }
}

#[test]
fn test_access_expiry_tracks_lifetime() {
    for minutes in [1, 5, 60, 1440] {
        let pair = fixed_issuer(minutes, 24).issue("user-1", &["read"]).unwrap();
        let claims = decode_claims(pair.access_token.as_str(), ACCESS_SECRET).unwrap();
        assert_eq!(claims["expires"], T0 + minutes * 60);
        assert_eq!(pair.expires_in, minutes * 60);
    }
}

#[test]
fn test_access_expiry_with_system_clock() {
    let issuer = TokenIssuer::with_system_clock(config(15, 24));

    let before = chrono::Utc::now().timestamp();
    let pair = issuer.issue("user-1", &["read"]).unwrap();
    let after = chrono::Utc::now().timestamp();

    let claims = issuer.access_codec().verify(pair.access_token.as_str()).unwrap();
    assert!(claims.expires >= before + 15 * 60);
    assert!(claims.expires <= after + 15 * 60);
}

#[test]
fn test_capability_claims_match_input() {
    let issuer = fixed_issuer(15, 24);
    let labels = ["read", "write", "billing"];

    let pair = issuer.issue("user-1", &labels).unwrap();
    let claims = decode_claims(pair.access_token.as_str(), ACCESS_SECRET).unwrap();

    for label in labels {
        assert_eq!(claims[label], true, "missing capability {label}");
    }

    let keys: HashSet<&str> = claims
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    let expected: HashSet<&str> = ["id", "expires", "jti", "read", "write", "billing"]
        .into_iter()
        .collect();
    assert_eq!(keys, expected);
    assert!(claims.get("admin").is_none());
}

#[test]
fn test_rapid_issuance_yields_distinct_access_tokens() {
    let issuer = TokenIssuer::with_system_clock(config(15, 24));

    let first = issuer.issue("user-1", &["read"]).unwrap();
    let second = issuer.issue("user-1", &["read"]).unwrap();

    assert_ne!(first.access_token, second.access_token);
}

// ============================================================================
// Refresh token
// ============================================================================

#[test]
fn test_refresh_expiry_roundtrip() {
    for hours in [1, 24, 24 * 30] {
        let pair = fixed_issuer(15, hours).issue("user-1", &["read"]).unwrap();
        let expiry = RefreshTokenCodec::extract_expiry(pair.refresh_token.as_str()).unwrap();
        assert_eq!(expiry, T0 + hours * 3600);
        assert_eq!(pair.refresh_token.expiry().unwrap(), expiry);
    }
}

#[test]
fn test_extract_expiry_rejects_malformed_tokens() {
    for input in ["", "abc", "digestonly", "digest.", "digest.notanumber"] {
        let result = RefreshTokenCodec::extract_expiry(input);
        assert!(result.is_err(), "{input:?} should not parse");
    }

    assert_eq!(
        RefreshTokenCodec::extract_expiry("digest."),
        Err(ParseError::EmptyExpiry)
    );
}

#[test]
fn test_extract_expiry_ignores_digest_contents() {
    assert_eq!(
        RefreshTokenCodec::extract_expiry("not-a-real-digest.1700000000").unwrap(),
        1_700_000_000
    );
}

// ============================================================================
// Failure modes
// ============================================================================

#[test]
fn test_missing_secrets_fail_issuance() {
    let clock = Arc::new(SystemClock);

    let no_access = SigningConfig::new("", 15, REFRESH_SECRET, 24).unwrap();
    let result = TokenIssuer::new(Arc::new(no_access), clock.clone()).issue("user-1", &["read"]);
    assert!(matches!(result, Err(IssuanceError::Signing(_))));

    let no_refresh = SigningConfig::new(ACCESS_SECRET, 15, "", 24).unwrap();
    let result = TokenIssuer::new(Arc::new(no_refresh), clock).issue("user-1", &["read"]);
    assert!(matches!(result, Err(IssuanceError::Hash(_))));
}

#[test]
fn test_concurrent_issuance() {
    let issuer = TokenIssuer::with_system_clock(config(15, 24));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let issuer = issuer.clone();
            std::thread::spawn(move || issuer.issue(&format!("user-{i}"), &["read"]))
        })
        .collect();

    for handle in handles {
        let pair = handle.join().unwrap().unwrap();
        assert!(issuer.access_codec().verify(pair.access_token.as_str()).is_ok());
    }
}
