//! Token acquisition for SharePoint Online.
//!
//! Resource-owner-password grant against the common Azure AD token endpoint,
//! with the site host as the resource. The token lives for the duration of
//! one CLI invocation; there is no refresh handling because no invocation
//! outlives the initial expiry window.

use std::time::{Duration, SystemTime};

use anyhow::Result;
use serde::{Deserialize, Serialize};

const TOKEN_URL: &str = "https://login.microsoftonline.com/common/oauth2/token";

/// Credentials for one named environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialSet {
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
}

/// An acquired access token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub access_token: String,
    pub expires_at: SystemTime,
}

impl TokenInfo {
    pub fn is_expired(&self) -> bool {
        SystemTime::now() >= self.expires_at
    }
}

/// Acquire an access token for the given site host.
pub async fn authenticate(
    http_client: &reqwest::Client,
    site_url: &str,
    credentials: &CredentialSet,
) -> Result<TokenInfo> {
    let resource = resource_for(site_url)?;
    log::info!("Authenticating to {} as {}", resource, credentials.username);

    let response = http_client
        .post(TOKEN_URL)
        .form(&[
            ("grant_type", "password"),
            ("client_id", &credentials.client_id),
            ("client_secret", &credentials.client_secret),
            ("username", &credentials.username),
            ("password", &credentials.password),
            ("resource", &resource),
        ])
        .send()
        .await?;

    log::debug!("Token request status: {}", response.status());

    if !response.status().is_success() {
        let error_text = response.text().await?;
        anyhow::bail!("Authentication failed: {}", error_text);
    }

    let token_data: serde_json::Value = response.json().await?;
    let Some(access_token) = token_data.get("access_token").and_then(|t| t.as_str()) else {
        anyhow::bail!("No access token in response");
    };

    // default to 1 hour if the endpoint omits expiry
    let expires_in = token_data
        .get("expires_in")
        .and_then(|e| e.as_u64())
        .unwrap_or(3600);

    Ok(TokenInfo {
        access_token: access_token.to_string(),
        expires_at: SystemTime::now() + Duration::from_secs(expires_in),
    })
}

/// The token resource is the scheme+host of the site URL.
fn resource_for(site_url: &str) -> Result<String> {
    let url = reqwest::Url::parse(site_url)?;
    let host = url
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("site URL '{}' has no host", site_url))?;
    Ok(format!("{}://{}", url.scheme(), host))
}
