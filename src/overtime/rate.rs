//! Tiered overtime rating.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{OvertimeConfig, TierBuckets};

/// Context flags for the date the overtime was worked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayContext {
    /// The worked span overlaps the configured night window.
    pub is_night: bool,
    /// The date is outside the employee's working days.
    pub is_weekend: bool,
    /// The date is a public holiday.
    pub is_holiday: bool,
}

/// The result of rating one day's overtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedOvertime {
    /// Hours split across the three tiers. Always sums to the input.
    pub buckets: TierBuckets,
    /// True when a night/weekend/holiday override billed the whole span
    /// at the top tier.
    pub override_applied: bool,
}

/// Splits overtime hours into tier buckets under the given configuration.
///
/// When the context matches an enabled 100% override the entire span is
/// billed at the top tier; otherwise hours fill the cumulative bands in
/// order. The buckets always sum exactly to `hours`.
///
/// # Errors
///
/// Rejects negative hours and a configuration whose second threshold is
/// below its first.
pub fn rate_overtime(
    hours: Decimal,
    config: &OvertimeConfig,
    context: DayContext,
) -> EngineResult<RatedOvertime> {
    if hours < Decimal::ZERO {
        return Err(EngineError::validation("hours", "must not be negative"));
    }
    if config.rate_50_threshold_hours < config.rate_25_threshold_hours {
        return Err(EngineError::ConfigurationInconsistency {
            message: format!(
                "rate_50_threshold_hours {} is below rate_25_threshold_hours {}",
                config.rate_50_threshold_hours, config.rate_25_threshold_hours
            ),
        });
    }

    let override_applied = (context.is_night && config.apply_100_for_night)
        || (context.is_weekend && config.apply_100_for_weekend)
        || (context.is_holiday && config.apply_100_for_holiday);

    if override_applied {
        return Ok(RatedOvertime {
            buckets: TierBuckets {
                rate_25_hours: Decimal::ZERO,
                rate_50_hours: Decimal::ZERO,
                rate_100_hours: hours,
            },
            override_applied: true,
        });
    }

    let first_band = config.rate_25_threshold_hours;
    let second_band = config.rate_50_threshold_hours - config.rate_25_threshold_hours;

    let bucket1 = hours.min(first_band);
    let bucket2 = (hours - first_band).max(Decimal::ZERO).min(second_band);
    let bucket3 = hours - bucket1 - bucket2;

    Ok(RatedOvertime {
        buckets: TierBuckets {
            rate_25_hours: bucket1,
            rate_50_hours: bucket2,
            rate_100_hours: bucket3,
        },
        override_applied: false,
    })
}

/// True when the worked span `[start, end)` overlaps the configured
/// night window `[night_start, night_end)`.
///
/// Both intervals may wrap midnight: the window is usually configured
/// that way (e.g. 21:00 to 06:00), and an overnight shift clocks out
/// with an earlier time of day than it clocked in.
pub fn span_overlaps_night(start: NaiveTime, end: NaiveTime, config: &OvertimeConfig) -> bool {
    // Two intervals on the clock face overlap exactly when either one
    // contains the other's start point.
    wrapped_contains(start, end, config.night_start)
        || wrapped_contains(config.night_start, config.night_end, start)
}

/// True when the possibly-midnight-wrapping interval `[start, end)`
/// contains the instant `t`.
fn wrapped_contains(start: NaiveTime, end: NaiveTime, t: NaiveTime) -> bool {
    if start <= end {
        t >= start && t < end
    } else {
        t >= start || t < end
    }
}
