//! TC3-HMAC-SHA256 请求签名
//!
//! Every literal below (header order, newlines, lowercase action) is part of
//! the signed material; changing any of them invalidates every request.

use std::fmt;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::providers::common::hmac_sha256;

/// Signature algorithm identifier.
pub const TC3_ALGORITHM: &str = "TC3-HMAC-SHA256";
/// Content type covered by the signature; must match the header actually sent.
pub const TC3_CONTENT_TYPE: &str = "application/json; charset=utf-8";
/// Headers covered by the signature, in canonical order.
pub const TC3_SIGNED_HEADERS: &str = "content-type;host;x-tc-action";
/// Largest accepted distance between the signing timestamp and the local clock.
pub const MAX_CLOCK_SKEW_SECS: u64 = 300;

const TC3_REQUEST: &str = "tc3_request";

/// 签名失败原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignError {
    /// The timestamp is outside the accepted window around the local clock.
    #[error("timestamp {timestamp} is {skew}s away from local time {now} (max {MAX_CLOCK_SKEW_SECS}s)")]
    ClockSkew {
        timestamp: i64,
        now: i64,
        skew: u64,
    },
    /// The timestamp cannot be converted to a calendar date.
    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),
    /// HMAC key setup failed.
    #[error("HMAC key rejected: {0}")]
    Key(String),
}

/// Output of one signing operation. Lives only for a single HTTP call.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub canonical_request: String,
    pub string_to_sign: String,
    /// Lowercase hex HMAC.
    pub signature: String,
    /// Value for the `Authorization` header.
    pub authorization: String,
    /// Unix seconds; also sent as `X-TC-Timestamp`.
    pub timestamp: i64,
}

impl fmt::Debug for SignedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedRequest")
            .field("timestamp", &self.timestamp)
            .finish_non_exhaustive()
    }
}

/// Signs Tencent Cloud API 3.0 requests for one service endpoint.
#[derive(Clone)]
pub struct Tc3Signer {
    secret_id: String,
    secret_key: String,
    service: String,
    host: String,
}

impl fmt::Debug for Tc3Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tc3Signer")
            .field("secret_id", &crate::utils::log_sanitizer::mask_secret(&self.secret_id))
            .field("service", &self.service)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl Tc3Signer {
    /// `service` is the lowercase product name (`"dnspod"`), `host` the value
    /// of the `Host` header the request will carry.
    pub fn new(
        secret_id: impl Into<String>,
        secret_key: impl Into<String>,
        service: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
            service: service.into(),
            host: host.into(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Sign a `POST /` request, checking `timestamp` against the local clock.
    pub fn sign(&self, action: &str, payload: &str, timestamp: i64) -> Result<SignedRequest, SignError> {
        self.sign_at(action, payload, timestamp, Utc::now().timestamp())
    }

    /// Same as [`sign`](Self::sign) with an explicit "now".
    pub fn sign_at(
        &self,
        action: &str,
        payload: &str,
        timestamp: i64,
        now: i64,
    ) -> Result<SignedRequest, SignError> {
        let skew = now.abs_diff(timestamp);
        if skew > MAX_CLOCK_SKEW_SECS {
            return Err(SignError::ClockSkew {
                timestamp,
                now,
                skew,
            });
        }

        let date = DateTime::from_timestamp(timestamp, 0)
            .ok_or(SignError::InvalidTimestamp(timestamp))?
            .format("%Y-%m-%d")
            .to_string();

        // 1. 规范请求串
        let canonical_request = self.canonical_request(action, payload);

        // 2. 待签名字符串
        let credential_scope = format!("{date}/{}/{TC3_REQUEST}", self.service);
        let string_to_sign = format!(
            "{TC3_ALGORITHM}\n{timestamp}\n{credential_scope}\n{}",
            sha256_hex(canonical_request.as_bytes())
        );

        // 3. 派生密钥链
        let key = |e: hmac::digest::InvalidLength| SignError::Key(e.to_string());
        let secret_date =
            hmac_sha256(format!("TC3{}", self.secret_key).as_bytes(), date.as_bytes()).map_err(key)?;
        let secret_service = hmac_sha256(&secret_date, self.service.as_bytes()).map_err(key)?;
        let secret_signing = hmac_sha256(&secret_service, TC3_REQUEST.as_bytes()).map_err(key)?;
        let signature =
            hex::encode(hmac_sha256(&secret_signing, string_to_sign.as_bytes()).map_err(key)?);

        // 4. Authorization
        let authorization = format!(
            "{TC3_ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={TC3_SIGNED_HEADERS}, Signature={signature}",
            self.secret_id
        );

        Ok(SignedRequest {
            canonical_request,
            string_to_sign,
            signature,
            authorization,
            timestamp,
        })
    }

    fn canonical_request(&self, action: &str, payload: &str) -> String {
        let canonical_headers = format!(
            "content-type:{TC3_CONTENT_TYPE}\nhost:{}\nx-tc-action:{}\n",
            self.host,
            action.to_lowercase()
        );
        format!(
            "POST\n/\n\n{canonical_headers}\n{TC3_SIGNED_HEADERS}\n{}",
            sha256_hex(payload.as_bytes())
        )
    }
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
