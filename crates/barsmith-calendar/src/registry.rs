//! Well-known calendars embedded at compile time.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::{CalendarError, Result, TradingSessions};

/// The calendar JSON embedded at compile time.
const CALENDARS_JSON: &str = include_str!("../data/calendars.json");

/// Global calendar registry instance.
static REGISTRY: OnceLock<CalendarRegistry> = OnceLock::new();

/// Registry of well-known trading calendars.
#[derive(Debug)]
pub struct CalendarRegistry {
    calendars: HashMap<String, Arc<TradingSessions>>,
}

impl CalendarRegistry {
    /// Returns the global calendar registry.
    ///
    /// The registry is initialized lazily on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(Self::load)
    }

    /// Loads calendars from the embedded JSON data.
    fn load() -> Self {
        Self::from_json(CALENDARS_JSON).expect("Invalid calendars.json")
    }

    /// Builds a registry from a JSON object mapping ids to calendars.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::Json`] if the JSON is malformed or any
    /// calendar fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let calendars: HashMap<String, TradingSessions> = serde_json::from_str(json)?;
        Ok(Self {
            calendars: calendars
                .into_iter()
                .map(|(id, sessions)| (id.to_lowercase(), Arc::new(sessions)))
                .collect(),
        })
    }

    /// Looks up a calendar by id (case-insensitive).
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<TradingSessions>> {
        self.calendars.get(&id.to_lowercase())
    }

    /// Looks up a calendar by id, failing for unknown ids.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::UnknownCalendar`] if no calendar has that id.
    pub fn require(&self, id: &str) -> Result<Arc<TradingSessions>> {
        self.get(id)
            .cloned()
            .ok_or_else(|| CalendarError::UnknownCalendar(id.to_string()))
    }

    /// Returns the total number of calendars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calendars.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calendars.is_empty()
    }

    /// Returns all calendar ids sorted alphabetically.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.calendars.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_registry_loads() {
        let registry = CalendarRegistry::global();
        assert_eq!(registry.ids(), vec!["24x7-utc", "cme-globex", "us-equities"]);
    }

    #[test]
    fn test_get_case_insensitive() {
        let registry = CalendarRegistry::global();
        assert!(registry.get("CME-Globex").is_some());
        assert!(matches!(registry.require("lse"), Err(CalendarError::UnknownCalendar(_))));
    }

    #[test]
    fn test_embedded_24x7_matches_factory() {
        let registry = CalendarRegistry::global();
        let embedded = registry.get("24x7-utc").unwrap();
        let built = TradingSessions::create_24x7(chrono_tz::UTC);
        assert_eq!(embedded.templates(), built.templates());
    }

    #[test]
    fn test_globex_evening_open() {
        let cme = CalendarRegistry::global().require("cme-globex").unwrap();
        // Sunday 2024-01-07 18:00 Chicago belongs to Monday's session
        let at = chrono_tz::America::Chicago
            .with_ymd_and_hms(2024, 1, 7, 18, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let s = cme.session_at(at);
        assert_eq!(s.session_date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(s.start, Utc.with_ymd_and_hms(2024, 1, 7, 23, 0, 0).unwrap());
    }

    #[test]
    fn test_from_json_rejects_invalid_calendar() {
        let json = r#"{"empty": {"name": "empty", "time_zone": "UTC", "templates": []}}"#;
        assert!(CalendarRegistry::from_json(json).is_err());
    }
}
