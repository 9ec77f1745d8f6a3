//! Google OAuth credential management.
//!
//! Owns the OAuth client credentials and hands out valid access tokens,
//! refreshing them when expired. Tokens and client credentials live in the
//! OS keyring; scopes come from configuration.

use super::keyring_store;
use super::oauth::{self, OAuthConfig, OAuthTokens};
use crate::error::OAuthError;

const SERVICE_NAME: &str = "google";
const REDIRECT_PORT: u16 = 18712;

/// Google OAuth credential holder.
pub struct GoogleAuth {
    client_id: String,
    client_secret: String,
    scopes: Vec<String>,
}

impl GoogleAuth {
    /// Load client credentials from the keyring. Fields are empty strings
    /// if nothing is stored yet.
    pub fn new(scopes: Vec<String>) -> Self {
        let client_id = keyring_store::get("google_client_id")
            .ok()
            .flatten()
            .unwrap_or_default();
        let client_secret = keyring_store::get("google_client_secret")
            .ok()
            .flatten()
            .unwrap_or_default();

        Self {
            client_id,
            client_secret,
            scopes,
        }
    }

    /// Persist Google OAuth client credentials to the OS keyring.
    pub fn set_credentials(client_id: &str, client_secret: &str) -> Result<(), OAuthError> {
        keyring_store::set("google_client_id", client_id)
            .map_err(|e| OAuthError::Storage(e.to_string()))?;
        keyring_store::set("google_client_secret", client_secret)
            .map_err(|e| OAuthError::Storage(e.to_string()))?;
        Ok(())
    }

    fn oauth_config(&self) -> OAuthConfig {
        OAuthConfig {
            service_name: SERVICE_NAME.to_string(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            scopes: self.scopes.clone(),
            redirect_port: REDIRECT_PORT,
        }
    }

    /// Whether OAuth tokens are stored for Google.
    pub fn is_authenticated(&self) -> bool {
        oauth::load_tokens(SERVICE_NAME).is_some()
    }

    /// Run the interactive OAuth flow. Requires client credentials.
    pub async fn authenticate(&self) -> Result<(), OAuthError> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(OAuthError::CredentialsNotConfigured {
                service: SERVICE_NAME.to_string(),
            });
        }

        oauth::authorize(&self.oauth_config()).await?;
        Ok(())
    }

    /// Remove stored tokens.
    pub fn disconnect(&self) -> Result<(), OAuthError> {
        keyring_store::delete(SERVICE_NAME).map_err(|e| OAuthError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Return a valid access token, refreshing if expired.
    pub async fn access_token(&self) -> Result<String, OAuthError> {
        let tokens: OAuthTokens =
            oauth::load_tokens(SERVICE_NAME).ok_or(OAuthError::NotAuthenticated {
                service: SERVICE_NAME.to_string(),
            })?;

        if !oauth::is_expired(&tokens) {
            return Ok(tokens.access_token);
        }

        let refresh = tokens
            .refresh_token
            .as_deref()
            .ok_or(OAuthError::TokenExpired)?;

        let refreshed = oauth::refresh_token(&self.oauth_config(), refresh).await?;
        Ok(refreshed.access_token)
    }
}
