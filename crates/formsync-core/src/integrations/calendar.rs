//! Google Calendar API client.
//!
//! Insert, whole-resource update, and upcoming-event listing against the
//! Calendar v3 REST surface. Deleted events answer update with 410 Gone,
//! which counts as not-found alongside 404.

use chrono::{DateTime, FixedOffset, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::check_status;
use crate::error::ApiError;

const CALENDAR_BASE_URL: &str = "https://www.googleapis.com";

/// Event payload sent on insert and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResource {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// Start or end of an event: either a timed instant or an all-day date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    pub fn timed(instant: DateTime<Utc>, time_zone: &str) -> Self {
        Self {
            date_time: Some(instant.fixed_offset()),
            date: None,
            time_zone: Some(time_zone.to_string()),
        }
    }
}

/// An event as returned by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start: Option<EventDateTime>,
    #[serde(default)]
    pub end: Option<EventDateTime>,
}

#[derive(Debug, Deserialize)]
struct EventsPage {
    #[serde(default)]
    items: Vec<Event>,
}

/// Remote operations the event reconciler depends on.
#[allow(async_fn_in_trait)]
pub trait CalendarApi {
    /// Create the event, returning the remote-assigned id.
    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &EventResource,
    ) -> Result<String, ApiError>;

    /// Replace the event wholesale, returning its id.
    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &EventResource,
    ) -> Result<String, ApiError>;

    /// Upcoming events ordered by start time, at most `max_results`.
    async fn list_upcoming(
        &self,
        calendar_id: &str,
        max_results: u32,
    ) -> Result<Vec<Event>, ApiError>;
}

/// HTTP client for the Google Calendar API.
pub struct CalendarClient {
    http: Client,
    base_url: String,
    token: String,
}

impl CalendarClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: CALENDAR_BASE_URL.to_string(),
            token: token.into(),
        }
    }

    #[cfg(test)]
    fn with_base_url(token: &str, base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.to_string(),
            token: token.to_string(),
        }
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendar/v3/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        )
    }
}

impl CalendarApi for CalendarClient {
    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &EventResource,
    ) -> Result<String, ApiError> {
        log::debug!("inserting event '{}' into {calendar_id}", event.summary);
        let resp = self
            .http
            .post(self.events_url(calendar_id))
            .bearer_auth(&self.token)
            .json(event)
            .send()
            .await?;
        let resp = check_status(resp, false).await?;
        let created: Event = resp.json().await?;
        Ok(created.id)
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &EventResource,
    ) -> Result<String, ApiError> {
        log::debug!("updating event {event_id} in {calendar_id}");
        let url = format!("{}/{event_id}", self.events_url(calendar_id));
        let resp = self
            .http
            .put(url)
            .bearer_auth(&self.token)
            .json(event)
            .send()
            .await?;
        let resp = check_status(resp, true).await?;
        let updated: Event = resp.json().await?;
        Ok(updated.id)
    }

    async fn list_upcoming(
        &self,
        calendar_id: &str,
        max_results: u32,
    ) -> Result<Vec<Event>, ApiError> {
        let resp = self
            .http
            .get(self.events_url(calendar_id))
            .bearer_auth(&self.token)
            .query(&[
                ("timeMin", Utc::now().to_rfc3339()),
                ("maxResults", max_results.to_string()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await?;
        let resp = check_status(resp, false).await?;
        let page: EventsPage = resp.json().await?;
        Ok(page.items)
    }
}
