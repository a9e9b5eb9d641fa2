//! Description of the outgoing request being signed.

/// The parts of an outgoing request that enter the signature.
///
/// The method is upper-cased and only the URL path is kept: scheme, host,
/// query string and fragment never take part in signing.
///
/// # Examples
///
/// ```
/// use pushsign_auth::request::RequestDescriptor;
///
/// let request = RequestDescriptor::new(
///     "post",
///     "https://push.example.com/api/v1/messages?trace=1",
///     Some(r#"{"b":2,"a":1}"#.to_owned()),
/// );
/// assert_eq!(request.method(), "POST");
/// assert_eq!(request.path(), "/api/v1/messages");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: String,
    path: String,
    body: Option<String>,
}

impl RequestDescriptor {
    /// Describe a request.
    ///
    /// `target` may be an absolute URL, an origin-form target (`/path?query`)
    /// or a bare path.
    pub fn new(method: impl AsRef<str>, target: impl AsRef<str>, body: Option<String>) -> Self {
        Self {
            method: method.as_ref().to_ascii_uppercase(),
            path: extract_path(target.as_ref()),
            body,
        }
    }

    /// Describe an `http` request from its parts and raw body text.
    #[must_use]
    pub fn from_parts(parts: &http::request::Parts, body: Option<&str>) -> Self {
        Self {
            method: parts.method.as_str().to_ascii_uppercase(),
            path: parts.uri.path().to_owned(),
            body: body.map(ToOwned::to_owned),
        }
    }

    /// The upper-cased HTTP method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The URL path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw body text, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Extract the path component of a request target.
///
/// Targets that `http::Uri` rejects (unresolved template variables, spaces)
/// fall back to plain string handling: a leading `scheme://authority` or host
/// segment is dropped and the query string and fragment are cut off.
fn extract_path(target: &str) -> String {
    if let Ok(uri) = target.parse::<http::Uri>() {
        if uri.scheme().is_some() || target.starts_with('/') {
            return uri.path().to_owned();
        }
    }

    let without_scheme = target.split_once("://").map_or(target, |(_, rest)| rest);
    let end = without_scheme
        .find(['?', '#'])
        .unwrap_or(without_scheme.len());
    let path_and_host = &without_scheme[..end];

    if path_and_host.starts_with('/') && !target.contains("://") {
        return path_and_host.to_owned();
    }

    match path_and_host.find('/') {
        Some(idx) => path_and_host[idx..].to_owned(),
        None => "/".to_owned(),
    }
}
