//! The record appended to the JSONL store after each reconciled resource.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Outcome of one reconciled campaign entry: where the published form lives
/// and the window during which it accepts applications.
///
/// Dates carry their timezone offset and serialize as RFC 3339 strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    /// Responder (view) URL of the published form.
    pub url: String,
    /// Form title as published.
    pub title: String,
    /// Human-readable description of the campaign entry.
    pub description: String,
    /// Start of the application window.
    pub start_date: DateTime<FixedOffset>,
    /// End of the application window.
    pub end_date: DateTime<FixedOffset>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_one_line_with_offset_dates() {
        let record = CampaignRecord {
            url: "https://docs.google.com/forms/d/e/abc/viewform".to_string(),
            title: "Volunteer application: Archivist".to_string(),
            description: "Application form for: Archivist".to_string(),
            start_date: "2025-10-04T09:00:00+02:00".parse().unwrap(),
            end_date: "2025-12-04T18:00:00+01:00".parse().unwrap(),
        };

        let line = serde_json::to_string(&record).unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains("+02:00"));

        let back: CampaignRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(back, record);
    }
}
