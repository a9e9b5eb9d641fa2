//! HMAC-SHA256 request signing for the message push API.
//!
//! This crate implements the client side of the push API's request
//! authentication: given an outgoing request and the application's
//! credentials it computes a signature and the headers that carry it.
//!
//! # Overview
//!
//! ```text
//! StringToSign = Method + Path + CanonicalParams + Timestamp + Nonce
//! Signature    = Hex(HMAC-SHA256(AppSecret, StringToSign))
//! ```
//!
//! `CanonicalParams` is the JSON body with object keys sorted at every depth,
//! or the empty string when there is no JSON body. The signature is sent in
//! `X-Signature` alongside `X-App-Id`, `X-Timestamp` and `X-Nonce`.
//!
//! # Usage
//!
//! ```rust
//! use pushsign_auth::{Credentials, RequestDescriptor, sign};
//!
//! let credentials = Credentials::new("app-1", "s3cr3t");
//! let request = RequestDescriptor::new(
//!     "POST",
//!     "/api/v1/messages",
//!     Some(r#"{"channel":"sms","to":"10086"}"#.to_owned()),
//! );
//!
//! let result = sign(&request, &credentials).unwrap();
//! assert_eq!(result.app_id, "app-1");
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical JSON parameter string
//! - [`config`] - Environment-driven configuration
//! - [`credentials`] - App id and secret
//! - [`error`] - Signing error types
//! - [`headers`] - Header injection into `http` requests
//! - [`nonce`] - UUID v4 nonce generation
//! - [`request`] - Description of the request being signed
//! - [`signer`] - String-to-sign and HMAC computation

pub mod canonical;
pub mod config;
pub mod credentials;
pub mod error;
pub mod headers;
pub mod nonce;
pub mod request;
pub mod signer;

pub use config::SignerConfig;
pub use credentials::Credentials;
pub use error::SignError;
pub use headers::{apply_signature_headers, sign_request};
pub use request::RequestDescriptor;
pub use signer::{SignatureContext, SignatureResult, sign, sign_with_context};
