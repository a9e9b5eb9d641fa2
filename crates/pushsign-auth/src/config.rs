//! Signer configuration.
//!
//! All configuration is driven by environment variables, the same names the
//! API testing tool environments use.

use std::env;

/// Environment variable holding the application id.
pub const APP_ID_VAR: &str = "APP_ID";

/// Environment variable holding the shared HMAC secret.
pub const APP_SECRET_VAR: &str = "APP_SECRET";

/// Configuration for request signing.
#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerConfig {
    /// Application id sent verbatim in `X-App-Id`.
    pub app_id: Option<String>,
    /// Shared secret used as the HMAC key.
    #[serde(skip_serializing)]
    pub app_secret: Option<String>,
    /// Log level filter, used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl SignerConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use pushsign_auth::config::SignerConfig;
    ///
    /// let config = SignerConfig::from_lookup(|key| match key {
    ///     "APP_ID" => Some("app-1".to_owned()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.app_id.as_deref(), Some("app-1"));
    /// assert!(config.app_secret.is_none());
    /// assert_eq!(config.log_level, "info");
    /// ```
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            app_id: lookup(APP_ID_VAR),
            app_secret: lookup(APP_SECRET_VAR),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_owned()),
        }
    }
}

impl std::fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerConfig")
            .field("app_id", &self.app_id)
            .field("app_secret", &self.app_secret.as_ref().map(|_| "<redacted>"))
            .field("log_level", &self.log_level)
            .finish()
    }
}
