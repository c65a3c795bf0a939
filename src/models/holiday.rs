//! Public holiday model.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A public holiday calendar fact.
///
/// Creating or deleting a holiday is not a plain CRUD write: it must
/// cascade into existing attendance records on that date (see the store's
/// holiday cascade operation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// Unique identifier of the holiday.
    pub id: String,
    /// The date of the holiday. Unique across the calendar.
    pub holiday_date: NaiveDate,
    /// The display name (e.g. "Labour Day").
    pub name: String,
    /// Recurring holidays match their month/day in every later year.
    pub is_recurring: bool,
}

impl PublicHoliday {
    /// True when this holiday falls on the given date.
    ///
    /// Non-recurring holidays match only their exact date; recurring ones
    /// match the same month and day in any year from their anchor year on.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        if self.is_recurring {
            date.year() >= self.holiday_date.year()
                && date.month() == self.holiday_date.month()
                && date.day() == self.holiday_date.day()
        } else {
            date == self.holiday_date
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_one_off_holiday_matches_exact_date_only() {
        let holiday = PublicHoliday {
            id: "h_001".to_string(),
            holiday_date: date(2026, 5, 1),
            name: "Labour Day".to_string(),
            is_recurring: false,
        };
        assert!(holiday.applies_on(date(2026, 5, 1)));
        assert!(!holiday.applies_on(date(2027, 5, 1)));
    }

    #[test]
    fn test_recurring_holiday_matches_later_years() {
        let holiday = PublicHoliday {
            id: "h_002".to_string(),
            holiday_date: date(2020, 1, 1),
            name: "New Year".to_string(),
            is_recurring: true,
        };
        assert!(holiday.applies_on(date(2020, 1, 1)));
        assert!(holiday.applies_on(date(2026, 1, 1)));
        assert!(!holiday.applies_on(date(2019, 1, 1)));
        assert!(!holiday.applies_on(date(2026, 1, 2)));
    }
}
