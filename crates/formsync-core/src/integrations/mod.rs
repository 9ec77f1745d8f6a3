pub mod calendar;
pub mod forms;
pub mod genai;
pub mod google;
pub mod oauth;

pub use calendar::{CalendarApi, CalendarClient};
pub use forms::{FormsApi, FormsClient};
pub use genai::GenAiClient;
pub use google::GoogleAuth;

use crate::error::ApiError;
use reqwest::StatusCode;

/// Map a non-success response to the binary not-found / other taxonomy.
///
/// The calendar API answers updates of deleted events with 410 Gone;
/// callers opt into treating that as not-found.
pub(crate) async fn check_status(
    resp: reqwest::Response,
    gone_is_not_found: bool,
) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status == StatusCode::NOT_FOUND || (gone_is_not_found && status == StatusCode::GONE) {
        return Err(ApiError::NotFound);
    }
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp)
}

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "formsync";

    pub fn get(key: &str) -> Result<Option<String>, keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
