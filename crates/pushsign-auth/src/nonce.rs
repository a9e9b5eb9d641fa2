//! Nonce generation.

use uuid::Uuid;

/// Generate a random nonce formatted as a lowercase, hyphenated UUID v4.
///
/// # Examples
///
/// ```
/// use pushsign_auth::nonce::generate_nonce;
///
/// let nonce = generate_nonce();
/// assert_eq!(nonce.len(), 36);
/// assert_eq!(&nonce[14..15], "4");
/// ```
#[must_use]
pub fn generate_nonce() -> String {
    Uuid::new_v4().hyphenated().to_string()
}
