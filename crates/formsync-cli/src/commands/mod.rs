pub mod auth;
pub mod campaign;
pub mod config;
pub mod event;
pub mod form;
pub mod gen;
pub mod records;

use formsync_core::{Config, GoogleAuth};

/// Build an authenticated Google token from stored credentials.
pub async fn google_token(config: &Config) -> Result<String, Box<dyn std::error::Error>> {
    let auth = GoogleAuth::new(config.google.scopes.clone());
    if !auth.is_authenticated() {
        return Err("Google is not authenticated. Run 'formsync-cli auth google login' first.".into());
    }
    Ok(auth.access_token().await?)
}
