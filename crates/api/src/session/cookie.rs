//! Session record codec: an HS256-signed JWT holding the key/value bag.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Everything a session cookie carries.
///
/// `exp` is fixed when the record is created and copied unchanged on every
/// rewrite, so the lifetime is absolute rather than sliding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

impl SessionRecord {
    /// Empty record that expires `lifetime` from now.
    pub fn new(lifetime: Duration) -> Self {
        let now = Utc::now().timestamp();
        let lifetime_secs = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);
        Self {
            data: Map::new(),
            iat: now,
            exp: now.saturating_add(lifetime_secs),
        }
    }

    /// Seconds left before the record expires, never negative.
    pub fn remaining_secs(&self) -> i64 {
        (self.exp - Utc::now().timestamp()).max(0)
    }
}

/// Sign a record into a cookie value.
pub fn encode_record(
    record: &SessionRecord,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(), // HS256
        record,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a cookie value and return its record.
///
/// Fails on a bad signature, a malformed token, or an `exp` in the past.
pub fn decode_record(
    token: &str,
    secret: &str,
) -> Result<SessionRecord, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default(); // HS256, validates exp
    validation.leeway = 0;
    let token_data = decode::<SessionRecord>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}
