//! Application credentials.
//!
//! [`Credentials`] pairs the application id with its shared secret. They are
//! supplied by the host (environment or configuration) and never generated
//! or stored here.

use crate::config::{APP_ID_VAR, APP_SECRET_VAR, SignerConfig};
use crate::error::SignError;

/// An application id and the secret used to sign its requests.
///
/// # Examples
///
/// ```
/// use pushsign_auth::credentials::Credentials;
///
/// let credentials = Credentials::new("app-1", "s3cr3t");
/// assert_eq!(credentials.app_id(), "app-1");
/// assert!(credentials.validate().is_ok());
/// assert!(!format!("{credentials:?}").contains("s3cr3t"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    app_id: String,
    app_secret: String,
}

impl Credentials {
    /// Create credentials from an app id and secret.
    ///
    /// Values are not checked here; signing rejects empty ones.
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        }
    }

    /// Build credentials from a [`SignerConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`SignError::MissingCredential`] if either value is absent or empty.
    pub fn from_config(config: &SignerConfig) -> Result<Self, SignError> {
        let credentials = Self::new(
            config.app_id.clone().unwrap_or_default(),
            config.app_secret.clone().unwrap_or_default(),
        );
        credentials.validate()?;
        Ok(credentials)
    }

    /// The application id.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// The shared secret.
    #[must_use]
    pub fn app_secret(&self) -> &str {
        &self.app_secret
    }

    /// Check that both values are present.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::MissingCredential`] naming the first empty value.
    pub fn validate(&self) -> Result<(), SignError> {
        if self.app_id.is_empty() {
            return Err(SignError::MissingCredential(APP_ID_VAR));
        }
        if self.app_secret.is_empty() {
            return Err(SignError::MissingCredential(APP_SECRET_VAR));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(app_id: Option<&str>, app_secret: Option<&str>) -> SignerConfig {
        SignerConfig {
            app_id: app_id.map(ToOwned::to_owned),
            app_secret: app_secret.map(ToOwned::to_owned),
            log_level: "info".to_owned(),
        }
    }

    #[test]
    fn test_should_build_credentials_from_complete_config() {
        let credentials = Credentials::from_config(&config(Some("app-1"), Some("s3cr3t"))).unwrap();
        assert_eq!(credentials.app_id(), "app-1");
        assert_eq!(credentials.app_secret(), "s3cr3t");
    }

    #[test]
    fn test_should_reject_missing_app_id() {
        let result = Credentials::from_config(&config(None, Some("s3cr3t")));
        assert!(matches!(result, Err(SignError::MissingCredential("APP_ID"))));
    }

    #[test]
    fn test_should_reject_empty_app_secret() {
        let result = Credentials::from_config(&config(Some("app-1"), Some("")));
        assert!(matches!(
            result,
            Err(SignError::MissingCredential("APP_SECRET"))
        ));
    }

    #[test]
    fn test_should_report_app_id_first_when_both_missing() {
        let result = Credentials::new("", "").validate();
        assert!(matches!(result, Err(SignError::MissingCredential("APP_ID"))));
    }
}
