//! Event and registration domain models.
//!
//! Events are owned by the server; the client only ever receives them in list
//! pages or embedded in a registration response and never edits them locally.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// An event that visitors can register for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: i64,
    pub name: String,
    pub location: String,
    /// Calendar day the event takes place.
    ///
    /// The API sends either a bare `YYYY-MM-DD` date or a full RFC 3339
    /// timestamp; both decode to the same day.
    #[serde(deserialize_with = "deserialize_event_date")]
    pub date: NaiveDate,
    pub available_spots: i64,
    pub created_at: DateTime<Utc>,
}

impl EventRecord {
    /// Returns the event date in US numeric form (`M/D/YYYY`).
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{NaiveDate, Utc};
    /// use eventdesk::domain::EventRecord;
    ///
    /// let event = EventRecord {
    ///     id: 1,
    ///     name: "RustConf".to_string(),
    ///     location: "Montreal".to_string(),
    ///     date: NaiveDate::from_ymd_opt(2025, 9, 2).unwrap(),
    ///     available_spots: 10,
    ///     created_at: Utc::now(),
    /// };
    /// assert_eq!(event.display_date(), "9/2/2025");
    /// ```
    #[must_use]
    pub fn display_date(&self) -> String {
        self.date.format("%-m/%-d/%Y").to_string()
    }

    /// Whether the server still reports free spots.
    #[must_use]
    pub const fn has_available_spots(&self) -> bool {
        self.available_spots > 0
    }
}

/// A confirmed registration returned by the register endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    /// The event after the registration, with its decremented spot count.
    pub event: EventRecord,
}

/// Body of a registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
}

/// Body of a contact-us request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub newsletter: bool,
}

fn deserialize_event_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_event_date(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid event date: {raw}"))
    })
}

fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_json(date: &str) -> String {
        format!(
            r#"{{"id":7,"name":"Meetup","location":"Berlin","date":"{date}","available_spots":3,"created_at":"2025-01-01T10:00:00Z"}}"#
        )
    }

    #[test]
    fn decodes_plain_and_timestamp_dates_to_the_same_day() {
        let plain: EventRecord = serde_json::from_str(&event_json("2025-03-14")).unwrap();
        let stamped: EventRecord =
            serde_json::from_str(&event_json("2025-03-14T18:30:00Z")).unwrap();

        assert_eq!(plain.date, stamped.date);
        assert_eq!(plain.display_date(), "3/14/2025");
    }

    #[test]
    fn rejects_garbage_dates() {
        let result: std::result::Result<EventRecord, _> =
            serde_json::from_str(&event_json("next tuesday"));
        assert!(result.is_err());
    }

    #[test]
    fn spot_availability_follows_server_count() {
        let mut event: EventRecord = serde_json::from_str(&event_json("2025-03-14")).unwrap();
        assert!(event.has_available_spots());
        event.available_spots = 0;
        assert!(!event.has_available_spots());
    }
}
