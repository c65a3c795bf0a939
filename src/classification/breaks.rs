//! Automatic break deduction.

use rust_decimal::Decimal;

use crate::models::BreakPolicy;

/// Deducts automatic breaks from a worked span.
///
/// When the policy deducts breaks automatically and the span exceeds
/// `break_start_after_hours`, one break of `default_break_minutes` is
/// subtracted; with `allow_multiple_breaks`, one break per full
/// `break_start_after_hours` of span, capped at `max_breaks_per_day`.
/// The result never goes below zero.
pub fn deduct_breaks(span_hours: Decimal, policy: &BreakPolicy) -> Decimal {
    if !policy.deduct_break_automatically
        || policy.break_start_after_hours <= Decimal::ZERO
        || span_hours <= policy.break_start_after_hours
    {
        return span_hours;
    }

    let break_count = if policy.allow_multiple_breaks {
        let earned = (span_hours / policy.break_start_after_hours).floor();
        let cap = Decimal::from(policy.max_breaks_per_day);
        if earned > cap { cap } else { earned }
    } else {
        Decimal::ONE
    };

    let deduction = break_count * Decimal::from(policy.default_break_minutes) / Decimal::from(60);
    let remaining = span_hours - deduction;
    if remaining < Decimal::ZERO {
        Decimal::ZERO
    } else {
        remaining
    }
}
