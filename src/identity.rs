//! Identity Check Module
//!
//! HTTP lookup against the remote identity function. The endpoint takes
//! the username as a query parameter and answers with a JSON array of
//! user records. The response shape is a weak external contract, so
//! every field is optional and validated by the caller.

use serde::Deserialize;
use tracing::{debug, info};

/// Client for the identity-check endpoint
pub struct IdentityClient {
    base_url: String,
    client: reqwest::Client,
}

impl IdentityClient {
    /// Create a new identity client
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Look up the records matching a username.
    ///
    /// `GET <base-url>?user=<username>`. A non-2xx status or transport
    /// failure is a `Network`/`Server` error; a body that is not an
    /// array of records is a `Parse` error.
    pub async fn lookup_user(&self, username: &str) -> Result<Vec<UserRecord>, IdentityError> {
        debug!("Checking identity at: {}", self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("user", username)])
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IdentityError::Server(format!(
                "status {}",
                response.status()
            )));
        }

        let records = response
            .json::<Vec<UserRecord>>()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))?;

        info!("Identity check returned {} record(s)", records.len());
        Ok(records)
    }
}

// Response types

/// One record from the identity endpoint
#[derive(Debug, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub data: Option<UserFields>,
}

impl UserRecord {
    /// The embedded user name, if the record carries one
    pub fn user_name(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.user_name.as_deref())
    }
}

/// Embedded payload of a user record
#[derive(Debug, Deserialize)]
pub struct UserFields {
    #[serde(rename = "userName")]
    pub user_name: Option<String>,
}

/// Identity check errors
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
