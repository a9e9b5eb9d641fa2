//! Header injection.
//!
//! Signed requests carry these headers, each set with upsert semantics
//! (any existing value of the same name is replaced):
//!
//! | Header | Value |
//! |---|---|
//! | `X-App-Id` | app id, verbatim |
//! | `X-Timestamp` | decimal Unix seconds |
//! | `X-Nonce` | UUID v4 |
//! | `X-Signature` | lowercase hex HMAC-SHA256 |
//! | `Content-Type` | `application/json` |

use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

use crate::credentials::Credentials;
use crate::error::SignError;
use crate::request::RequestDescriptor;
use crate::signer::{SignatureResult, sign};

/// `X-App-Id` header name.
pub const X_APP_ID: HeaderName = HeaderName::from_static("x-app-id");
/// `X-Timestamp` header name.
pub const X_TIMESTAMP: HeaderName = HeaderName::from_static("x-timestamp");
/// `X-Nonce` header name.
pub const X_NONCE: HeaderName = HeaderName::from_static("x-nonce");
/// `X-Signature` header name.
pub const X_SIGNATURE: HeaderName = HeaderName::from_static("x-signature");

const APPLICATION_JSON: &str = "application/json";

/// The headers of a signature, in injection order, with display-case names.
#[must_use]
pub fn signature_header_pairs(result: &SignatureResult) -> [(&'static str, &str); 5] {
    [
        ("X-App-Id", result.app_id.as_str()),
        ("X-Timestamp", result.timestamp.as_str()),
        ("X-Nonce", result.nonce.as_str()),
        ("X-Signature", result.signature.as_str()),
        ("Content-Type", APPLICATION_JSON),
    ]
}

/// Upsert the signature headers into `headers`.
///
/// All values are validated before the map is touched, so on error the map
/// is left unchanged.
///
/// # Errors
///
/// Returns [`SignError::InvalidHeaderValue`] if a value is not a valid HTTP
/// header value (for example an app id containing a newline).
pub fn apply_signature_headers(
    headers: &mut HeaderMap,
    result: &SignatureResult,
) -> Result<(), SignError> {
    let app_id = header_value("X-App-Id", &result.app_id)?;
    let timestamp = header_value("X-Timestamp", &result.timestamp)?;
    let nonce = header_value("X-Nonce", &result.nonce)?;
    let signature = header_value("X-Signature", &result.signature)?;

    headers.insert(X_APP_ID, app_id);
    headers.insert(X_TIMESTAMP, timestamp);
    headers.insert(X_NONCE, nonce);
    headers.insert(X_SIGNATURE, signature);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));

    Ok(())
}

/// Sign an outgoing `http` request in place.
///
/// The body takes part in the signature only if it is UTF-8 text; anything
/// else is treated like an invalid JSON body. Nothing is written to the
/// request if signing fails.
///
/// # Errors
///
/// Returns [`SignError::MissingCredential`] for empty credentials and
/// [`SignError::InvalidHeaderValue`] if the app id cannot be sent as a header.
///
/// # Examples
///
/// ```
/// use pushsign_auth::credentials::Credentials;
/// use pushsign_auth::headers::sign_request;
///
/// let mut request = http::Request::builder()
///     .method("POST")
///     .uri("https://push.example.com/api/v1/messages")
///     .body(r#"{"b":2,"a":1}"#.to_owned())
///     .unwrap();
///
/// let result = sign_request(&mut request, &Credentials::new("app-1", "s3cr3t")).unwrap();
/// assert_eq!(request.headers()["x-signature"], result.signature.as_str());
/// assert_eq!(request.headers()["content-type"], "application/json");
/// ```
pub fn sign_request<B: AsRef<[u8]>>(
    request: &mut http::Request<B>,
    credentials: &Credentials,
) -> Result<SignatureResult, SignError> {
    let body = match std::str::from_utf8(request.body().as_ref()) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(error = %e, "request body is not valid UTF-8, signing without parameters");
            None
        }
    };
    let descriptor = RequestDescriptor::new(
        request.method().as_str(),
        request.uri().path(),
        body.map(ToOwned::to_owned),
    );

    let result = sign(&descriptor, credentials)?;
    apply_signature_headers(request.headers_mut(), &result)?;
    Ok(result)
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, SignError> {
    HeaderValue::from_str(value).map_err(|source| SignError::InvalidHeaderValue { name, source })
}
