//! Shell Configuration Module
//!
//! Everything the embedding application can vary: the identity
//! endpoint, the placeholder account policy, and the loading-screen
//! behavior.

/// Identity function of the WearCity backend
const DEFAULT_IDENTITY_URL: &str =
    "https://wearablecity.netlify.com/.netlify/functions/users-read-by-ringid";

// TODO: replace the fixed-account check and constant token once the
// identity service issues real per-user tokens.
const DEFAULT_EXPECTED_ACCOUNT: &str = "test";
const DEFAULT_ISSUED_TOKEN: &str = "dummy-auth-token";

/// Configuration for the session shell
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Base URL of the identity-check endpoint
    pub identity_url: String,
    /// Account name the first returned record must match
    pub expected_account: String,
    /// Opaque token issued on a successful sign-in
    pub issued_token: String,
    /// Render the auth/main view immediately instead of the loading view
    pub skip_loading_screen: bool,
}

impl ShellConfig {
    /// Build a config from the environment, falling back to defaults.
    /// `WEARCITY_API_URL` overrides the identity endpoint.
    pub fn from_env() -> Self {
        let identity_url =
            std::env::var("WEARCITY_API_URL").unwrap_or_else(|_| DEFAULT_IDENTITY_URL.to_string());

        Self {
            identity_url,
            ..Self::default()
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            expected_account: DEFAULT_EXPECTED_ACCOUNT.to_string(),
            issued_token: DEFAULT_ISSUED_TOKEN.to_string(),
            skip_loading_screen: false,
        }
    }
}
