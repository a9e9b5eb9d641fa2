//! Request signature computation.
//!
//! The string to sign is the concatenation, with no delimiters, of:
//!
//! ```text
//! Method + Path + CanonicalParams + Timestamp + Nonce
//! ```
//!
//! and the signature is `Hex(HMAC-SHA256(AppSecret, StringToSign))`, lowercase.
//!
//! The main entry point is [`sign`]. [`sign_with_context`] takes a pinned
//! timestamp and nonce and is fully deterministic.

use chrono::Utc;
use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;
use tracing::{debug, error};

use crate::canonical::canonical_params;
use crate::credentials::Credentials;
use crate::error::SignError;
use crate::nonce::generate_nonce;
use crate::request::RequestDescriptor;

type HmacSha256 = Hmac<Sha256>;

/// Per-invocation timestamp and nonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureContext {
    /// Unix time in whole seconds, as a decimal string.
    pub timestamp: String,
    /// UUID v4 nonce.
    pub nonce: String,
}

impl SignatureContext {
    /// Pin a timestamp and nonce.
    pub fn new(timestamp: impl Into<String>, nonce: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            nonce: nonce.into(),
        }
    }

    /// Take the current time and a fresh random nonce.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            timestamp: Utc::now().timestamp().to_string(),
            nonce: generate_nonce(),
        }
    }
}

/// The values to inject into the outgoing request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureResult {
    /// Application id, passed through verbatim.
    pub app_id: String,
    /// Unix time in whole seconds.
    pub timestamp: String,
    /// UUID v4 nonce.
    pub nonce: String,
    /// Lowercase hex HMAC-SHA256 digest.
    pub signature: String,
    /// Canonical parameter string that was signed (empty without a JSON body).
    pub canonical_params: String,
    /// The exact string that was signed.
    pub string_to_sign: String,
}

/// Build the string to sign.
///
/// # Examples
///
/// ```
/// use pushsign_auth::signer::build_string_to_sign;
///
/// let sts = build_string_to_sign(
///     "POST",
///     "/api/v1/messages",
///     r#"{"a":1,"b":2}"#,
///     "1700000000",
///     "11111111-1111-4111-8111-111111111111",
/// );
/// assert_eq!(
///     sts,
///     r#"POST/api/v1/messages{"a":1,"b":2}170000000011111111-1111-4111-8111-111111111111"#
/// );
/// ```
#[must_use]
pub fn build_string_to_sign(
    method: &str,
    path: &str,
    canonical_params: &str,
    timestamp: &str,
    nonce: &str,
) -> String {
    format!("{method}{path}{canonical_params}{timestamp}{nonce}")
}

/// Compute the HMAC-SHA256 of `string_to_sign` keyed by `secret`.
///
/// Returns the lowercase hex-encoded digest.
#[must_use]
pub fn compute_signature(secret: &str, string_to_sign: &str) -> String {
    hex::encode(hmac_sha256(secret.as_bytes(), string_to_sign.as_bytes()))
}

/// Sign a request with the current time and a fresh nonce.
///
/// # Errors
///
/// Returns [`SignError::MissingCredential`] if the app id or secret is empty.
pub fn sign(
    request: &RequestDescriptor,
    credentials: &Credentials,
) -> Result<SignatureResult, SignError> {
    sign_with_context(request, credentials, &SignatureContext::generate())
}

/// Sign a request with a caller-supplied timestamp and nonce.
///
/// # Errors
///
/// Returns [`SignError::MissingCredential`] if the app id or secret is empty.
///
/// # Examples
///
/// ```
/// use pushsign_auth::credentials::Credentials;
/// use pushsign_auth::request::RequestDescriptor;
/// use pushsign_auth::signer::{SignatureContext, sign_with_context};
///
/// let request = RequestDescriptor::new("GET", "/api/v1/status", None);
/// let credentials = Credentials::new("app-1", "s3cr3t");
/// let context = SignatureContext::new("1700000000", "11111111-1111-4111-8111-111111111111");
///
/// let result = sign_with_context(&request, &credentials, &context).unwrap();
/// assert_eq!(result.canonical_params, "");
/// assert_eq!(result.signature.len(), 64);
/// ```
pub fn sign_with_context(
    request: &RequestDescriptor,
    credentials: &Credentials,
    context: &SignatureContext,
) -> Result<SignatureResult, SignError> {
    if let Err(e) = credentials.validate() {
        error!(error = %e, "cannot sign request");
        return Err(e);
    }

    let canonical_params = canonical_params(request.body());
    let string_to_sign = build_string_to_sign(
        request.method(),
        request.path(),
        &canonical_params,
        &context.timestamp,
        &context.nonce,
    );
    let signature = compute_signature(credentials.app_secret(), &string_to_sign);

    let shown_params = if canonical_params.is_empty() {
        "(empty)"
    } else {
        canonical_params.as_str()
    };
    debug!(
        method = %request.method(),
        path = %request.path(),
        timestamp = %context.timestamp,
        nonce = %context.nonce,
        canonical_params = %shown_params,
        string_to_sign = %string_to_sign,
        signature = %signature,
        "Signed request"
    );

    Ok(SignatureResult {
        app_id: credentials.app_id().to_owned(),
        timestamp: context.timestamp.clone(),
        nonce: context.nonce.clone(),
        signature,
        canonical_params,
        string_to_sign,
    })
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
