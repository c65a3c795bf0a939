//! Overtime configuration, declared windows and recorded overtime.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The three configurable pay-multiplier bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateTier {
    /// First band (typically +25%).
    Rate25,
    /// Second band (typically +50%).
    Rate50,
    /// Top band (typically +100%); also used for night/weekend/holiday
    /// overrides.
    Rate100,
}

/// The active overtime configuration.
///
/// Always passed explicitly into the rate engine, never read from a
/// global, so rating stays a pure function of its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimeConfig {
    /// Hours per day beyond which no more overtime may be classified.
    pub daily_threshold_hours: Decimal,
    /// Hours per week beyond which no more overtime may be classified.
    pub weekly_threshold_hours: Decimal,
    /// Hard monthly cap; exceeding it is a policy rejection, not a
    /// truncation.
    pub monthly_max_hours: Decimal,
    /// Multiplier for the first band.
    pub rate_25_multiplier: Decimal,
    /// Multiplier for the second band.
    pub rate_50_multiplier: Decimal,
    /// Multiplier for the top band.
    pub rate_100_multiplier: Decimal,
    /// Cumulative hours ending the first band.
    pub rate_25_threshold_hours: Decimal,
    /// Cumulative hours ending the second band.
    pub rate_50_threshold_hours: Decimal,
    /// Start of the night window.
    pub night_start: NaiveTime,
    /// End of the night window.
    pub night_end: NaiveTime,
    /// Bill whole night spans at the top band.
    pub apply_100_for_night: bool,
    /// Bill whole weekend spans at the top band.
    pub apply_100_for_weekend: bool,
    /// Bill whole holiday spans at the top band.
    pub apply_100_for_holiday: bool,
    /// Overtime records must resolve to a declared overtime period.
    pub requires_prior_approval: bool,
    /// Optimistic version, bumped on every admin edit.
    pub version: u32,
}

impl OvertimeConfig {
    /// Returns the multiplier for a tier under this configuration.
    pub fn multiplier(&self, tier: RateTier) -> Decimal {
        match tier {
            RateTier::Rate25 => self.rate_25_multiplier,
            RateTier::Rate50 => self.rate_50_multiplier,
            RateTier::Rate100 => self.rate_100_multiplier,
        }
    }
}

/// Lifecycle of a declared overtime window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimePeriodStatus {
    /// Records may link to the window.
    Active,
    /// Withdrawn; no longer matchable.
    Cancelled,
}

/// A manager-declared overtime window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimePeriod {
    /// Unique identifier of the window.
    pub id: String,
    /// The date the window covers.
    pub date: NaiveDate,
    /// Start of the window.
    pub start_time: NaiveTime,
    /// End of the window.
    pub end_time: NaiveTime,
    /// The department the window was declared for.
    pub department_id: String,
    /// The tier the manager declared for the window.
    pub rate_type: RateTier,
    /// Lifecycle status.
    pub status: OvertimePeriodStatus,
}

/// Hours split across the three tiers for one day of overtime.
///
/// Invariant: the three buckets always sum to the rated hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBuckets {
    /// Hours billed at the first band.
    pub rate_25_hours: Decimal,
    /// Hours billed at the second band.
    pub rate_50_hours: Decimal,
    /// Hours billed at the top band.
    pub rate_100_hours: Decimal,
}

impl TierBuckets {
    /// Total hours across all three buckets.
    pub fn total(&self) -> Decimal {
        self.rate_25_hours + self.rate_50_hours + self.rate_100_hours
    }
}

/// A persisted overtime entry for one employee-date.
///
/// At most one record may exist per (employee, date, period) when a
/// period is linked; duplicates are rejected at write time, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimeRecord {
    /// Unique identifier of the record.
    pub id: String,
    /// The employee the overtime belongs to.
    pub employee_id: String,
    /// The date the overtime was worked.
    pub overtime_date: NaiveDate,
    /// Total overtime hours recorded.
    pub hours: Decimal,
    /// The resolved split across rate tiers.
    pub buckets: TierBuckets,
    /// The declared window this record resolved to, when approval is
    /// required or a window was matched.
    pub overtime_period_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_multiplier_lookup_by_tier() {
        let config = OvertimeConfig {
            daily_threshold_hours: dec("4"),
            weekly_threshold_hours: dec("12"),
            monthly_max_hours: dec("40"),
            rate_25_multiplier: dec("1.25"),
            rate_50_multiplier: dec("1.5"),
            rate_100_multiplier: dec("2.0"),
            rate_25_threshold_hours: dec("8"),
            rate_50_threshold_hours: dec("16"),
            night_start: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            night_end: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            apply_100_for_night: true,
            apply_100_for_weekend: true,
            apply_100_for_holiday: true,
            requires_prior_approval: false,
            version: 1,
        };
        assert_eq!(config.multiplier(RateTier::Rate25), dec("1.25"));
        assert_eq!(config.multiplier(RateTier::Rate50), dec("1.5"));
        assert_eq!(config.multiplier(RateTier::Rate100), dec("2.0"));
    }

    #[test]
    fn test_tier_buckets_total() {
        let buckets = TierBuckets {
            rate_25_hours: dec("8"),
            rate_50_hours: dec("8"),
            rate_100_hours: dec("4"),
        };
        assert_eq!(buckets.total(), dec("20"));
    }

    #[test]
    fn test_rate_tier_stored_form() {
        assert_eq!(
            serde_json::to_string(&RateTier::Rate100).unwrap(),
            "\"rate100\""
        );
    }
}
