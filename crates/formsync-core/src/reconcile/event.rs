//! Calendar event reconciliation.
//!
//! Unlike forms, an event update is a single whole-resource replace; there
//! is no fetch-first step. A cached identifier the remote side answers
//! with not-found (404, or 410 for deleted events) triggers immediate
//! recreation under a freshly written identifier.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};
use crate::integrations::calendar::{CalendarApi, EventDateTime, EventResource};
use crate::store::id_file;

fn default_time_zone() -> String {
    "UTC".to_string()
}

/// Desired state of a calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

impl EventDefinition {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.summary.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "summary".to_string(),
                message: "event summary must not be empty".to_string(),
            });
        }
        if self.end <= self.start {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    fn to_resource(&self) -> EventResource {
        EventResource {
            summary: self.summary.clone(),
            description: self.description.clone(),
            start: EventDateTime::timed(self.start, &self.time_zone),
            end: EventDateTime::timed(self.end, &self.time_zone),
        }
    }
}

/// Create-or-update reconciler for a single calendar event.
pub struct EventReconciler<'a, A> {
    api: &'a A,
    calendar_id: String,
    id_path: PathBuf,
}

impl<'a, A: CalendarApi> EventReconciler<'a, A> {
    pub fn new(api: &'a A, calendar_id: impl Into<String>, id_path: impl Into<PathBuf>) -> Self {
        Self {
            api,
            calendar_id: calendar_id.into(),
            id_path: id_path.into(),
        }
    }

    /// Reconcile the remote event with `desired` and return the remote
    /// event id (needed by callers for follow-up operations such as
    /// attendee patches).
    pub async fn reconcile(&self, desired: &EventDefinition) -> Result<String, CoreError> {
        desired.validate()?;
        let resource = desired.to_resource();

        if let Some(event_id) = id_file::load(&self.id_path)? {
            match self
                .api
                .update_event(&self.calendar_id, &event_id, &resource)
                .await
            {
                Ok(id) => {
                    log::info!("event {id} updated on {}", self.calendar_id);
                    return Ok(id);
                }
                Err(e) if e.is_not_found() => {
                    log::warn!("event {event_id} not found remotely, creating a new one");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let new_id = self.api.insert_event(&self.calendar_id, &resource).await?;
        id_file::store(&self.id_path, &new_id)?;
        log::info!("event created: {new_id}");
        Ok(new_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::integrations::calendar::Event;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Inner {
        events: BTreeMap<String, EventResource>,
        next_id: u32,
        insert_calls: u32,
        update_failure: Option<u16>,
    }

    /// In-memory stand-in for the Calendar API.
    #[derive(Default)]
    struct FakeCalendar {
        inner: Mutex<Inner>,
    }

    impl FakeCalendar {
        fn with_update_failure(status: u16) -> Self {
            let fake = Self::default();
            fake.inner.lock().unwrap().update_failure = Some(status);
            fake
        }

        fn event_count(&self) -> usize {
            self.inner.lock().unwrap().events.len()
        }

        fn event(&self, id: &str) -> EventResource {
            self.inner.lock().unwrap().events[id].clone()
        }

        fn insert_calls(&self) -> u32 {
            self.inner.lock().unwrap().insert_calls
        }
    }

    impl CalendarApi for FakeCalendar {
        async fn insert_event(
            &self,
            _calendar_id: &str,
            event: &EventResource,
        ) -> Result<String, ApiError> {
            let mut inner = self.inner.lock().unwrap();
            inner.insert_calls += 1;
            inner.next_id += 1;
            let id = format!("evt-{}", inner.next_id);
            inner.events.insert(id.clone(), event.clone());
            Ok(id)
        }

        async fn update_event(
            &self,
            _calendar_id: &str,
            event_id: &str,
            event: &EventResource,
        ) -> Result<String, ApiError> {
            let mut inner = self.inner.lock().unwrap();
            if let Some(status) = inner.update_failure {
                return Err(ApiError::Status {
                    status,
                    message: "remote failure".to_string(),
                });
            }
            if !inner.events.contains_key(event_id) {
                return Err(ApiError::NotFound);
            }
            inner.events.insert(event_id.to_string(), event.clone());
            Ok(event_id.to_string())
        }

        async fn list_upcoming(
            &self,
            _calendar_id: &str,
            _max_results: u32,
        ) -> Result<Vec<Event>, ApiError> {
            Ok(Vec::new())
        }
    }

    fn definition(summary: &str) -> EventDefinition {
        EventDefinition {
            summary: summary.to_string(),
            description: Some("interviews".to_string()),
            start: "2025-10-04T09:00:00Z".parse().unwrap(),
            end: "2025-10-04T10:00:00Z".parse().unwrap(),
            time_zone: "Europe/Warsaw".to_string(),
        }
    }

    #[tokio::test]
    async fn first_reconcile_inserts_and_writes_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let id_path = dir.path().join("event_id.txt");
        let fake = FakeCalendar::default();
        let reconciler = EventReconciler::new(&fake, "primary", &id_path);

        let id = reconciler.reconcile(&definition("Kickoff")).await.unwrap();

        assert_eq!(fake.event_count(), 1);
        assert_eq!(id_file::load(&id_path).unwrap().as_deref(), Some(id.as_str()));
        assert_eq!(fake.event(&id).summary, "Kickoff");
    }

    #[tokio::test]
    async fn second_reconcile_replaces_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let id_path = dir.path().join("event_id.txt");
        let fake = FakeCalendar::default();
        let reconciler = EventReconciler::new(&fake, "primary", &id_path);

        let first = reconciler.reconcile(&definition("Kickoff")).await.unwrap();
        let second = reconciler.reconcile(&definition("Kickoff v2")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fake.event_count(), 1);
        assert_eq!(fake.insert_calls(), 1);
        assert_eq!(fake.event(&second).summary, "Kickoff v2");
        assert_eq!(
            id_file::load(&id_path).unwrap().as_deref(),
            Some(first.as_str())
        );
    }

    #[tokio::test]
    async fn not_found_on_update_recreates_with_new_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let id_path = dir.path().join("event_id.txt");
        id_file::store(&id_path, "deleted-event").unwrap();

        let fake = FakeCalendar::default();
        let reconciler = EventReconciler::new(&fake, "primary", &id_path);
        let id = reconciler.reconcile(&definition("Kickoff")).await.unwrap();

        assert_ne!(id, "deleted-event");
        assert_eq!(id_file::load(&id_path).unwrap().as_deref(), Some(id.as_str()));
        assert_eq!(fake.event_count(), 1);
    }

    #[tokio::test]
    async fn other_update_failure_propagates_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let id_path = dir.path().join("event_id.txt");
        id_file::store(&id_path, "evt-kept").unwrap();

        let fake = FakeCalendar::with_update_failure(503);
        let reconciler = EventReconciler::new(&fake, "primary", &id_path);
        let err = reconciler.reconcile(&definition("Kickoff")).await.unwrap_err();

        assert!(matches!(
            err,
            CoreError::Api(ApiError::Status { status: 503, .. })
        ));
        assert_eq!(fake.insert_calls(), 0);
        assert_eq!(id_file::load(&id_path).unwrap().as_deref(), Some("evt-kept"));
    }

    #[tokio::test]
    async fn inverted_time_range_is_rejected_before_any_call() {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeCalendar::default();
        let reconciler = EventReconciler::new(&fake, "primary", dir.path().join("e.txt"));

        let mut bad = definition("Kickoff");
        bad.end = bad.start;
        let err = reconciler.reconcile(&bad).await.unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(fake.insert_calls(), 0);
    }
}
