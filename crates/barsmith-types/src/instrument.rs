//! Financial instrument definitions.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{Increment, Result, ValidationError};

/// Cheaply clonable instrument identifier (e.g. `"ES"`, `"EURUSD"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InstrumentId(Arc<str>);

impl InstrumentId {
    /// Creates an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyInstrumentId`] for a blank id.
    pub fn new(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(ValidationError::EmptyInstrumentId);
        }
        Ok(Self(Arc::from(id)))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for InstrumentId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<InstrumentId> for String {
    fn from(id: InstrumentId) -> Self {
        id.0.to_string()
    }
}

impl std::fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Daily settlement time of an instrument, in the exchange time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettlementTime {
    /// Local time of day of the settlement.
    pub time: NaiveTime,
    /// Exchange time zone.
    pub time_zone: Tz,
}

impl SettlementTime {
    /// Creates a settlement time.
    #[must_use]
    pub const fn new(time: NaiveTime, time_zone: Tz) -> Self {
        Self { time, time_zone }
    }
}

/// Represents a tradable financial instrument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    id: InstrumentId,
    name: String,
    price_increment: Increment,
    quantity_increment: Increment,
    #[serde(default)]
    settlement: Option<SettlementTime>,
    #[serde(default)]
    holidays: BTreeSet<NaiveDate>,
}

impl Instrument {
    /// Creates a new instrument without settlement time or holidays.
    #[must_use]
    pub fn new(
        id: InstrumentId,
        name: impl Into<String>,
        price_increment: Increment,
        quantity_increment: Increment,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price_increment,
            quantity_increment,
            settlement: None,
            holidays: BTreeSet::new(),
        }
    }

    /// Sets the daily settlement time.
    #[must_use]
    pub fn with_settlement(mut self, settlement: SettlementTime) -> Self {
        self.settlement = Some(settlement);
        self
    }

    /// Adds exchange holidays.
    #[must_use]
    pub fn with_holidays(mut self, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.holidays.extend(holidays);
        self
    }

    /// Returns the instrument identifier.
    #[must_use]
    pub const fn id(&self) -> &InstrumentId {
        &self.id
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the minimum price increment.
    #[must_use]
    pub const fn price_increment(&self) -> Increment {
        self.price_increment
    }

    /// Returns the minimum quantity increment.
    #[must_use]
    pub const fn quantity_increment(&self) -> Increment {
        self.quantity_increment
    }

    /// Returns the settlement time, if the instrument settles daily.
    #[must_use]
    pub const fn settlement(&self) -> Option<SettlementTime> {
        self.settlement
    }

    /// Returns the listed exchange holidays.
    #[must_use]
    pub const fn holidays(&self) -> &BTreeSet<NaiveDate> {
        &self.holidays
    }

    /// Returns true unless `date` falls on a weekend or a listed holiday.
    #[must_use]
    pub fn is_trading_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }

    /// Returns `date` if it is a trading day, otherwise the next one.
    #[must_use]
    pub fn this_or_next_trading_day(&self, date: NaiveDate) -> NaiveDate {
        let mut day = date;
        while !self.is_trading_day(day) {
            match day.checked_add_days(Days::new(1)) {
                Some(next) => day = next,
                None => break,
            }
        }
        day
    }

    /// Returns `date` if it is a trading day, otherwise the previous one.
    #[must_use]
    pub fn this_or_previous_trading_day(&self, date: NaiveDate) -> NaiveDate {
        let mut day = date;
        while !self.is_trading_day(day) {
            match day.checked_sub_days(Days::new(1)) {
                Some(prev) => day = prev,
                None => break,
            }
        }
        day
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
