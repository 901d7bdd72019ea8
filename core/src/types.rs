//! Shared primitive types used across the plan core.

/// A money amount. Computed components are rounded to cents.
pub type Money = f64;

/// A cohort member's position, `1..=cohort_size`.
/// Negative values are deserted-bid placeholders.
pub type OrderNumber = i64;

/// 0-based month index within a plan's term.
pub type MonthIndex = usize;

/// The canonical group identifier, e.g. "GR-002".
pub type GroupId = String;

/// Round to cents, half away from zero.
pub fn round_cents(amount: Money) -> Money {
    (amount * 100.0).round() / 100.0
}
