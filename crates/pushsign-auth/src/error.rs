//! Error types for request signing.
//!
//! Signing has exactly one fatal failure mode: missing credentials. Bodies that
//! cannot be canonicalized are not errors (see [`crate::canonical`]).

/// Errors that can occur while signing a request.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// A required credential is absent or empty. Carries the configuration
    /// variable name (`APP_ID` or `APP_SECRET`).
    #[error("Missing {0}: configure APP_ID and APP_SECRET in the environment")]
    MissingCredential(&'static str),

    /// A computed header value cannot be represented as an HTTP header value.
    #[error("Invalid value for header {name}")]
    InvalidHeaderValue {
        /// The header that was being set.
        name: &'static str,
        /// The underlying conversion error.
        #[source]
        source: http::header::InvalidHeaderValue,
    },
}
