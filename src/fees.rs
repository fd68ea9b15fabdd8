//! Transaction fee calculation.
//!
//! Two fixed percentage tiers: 0.75% for amounts up to 100, 1% above.
//! Non-positive amounts carry no fee. Pure and deterministic.

/// Compute the transaction fee for a monetary amount, rounded to 2 decimals.
pub fn fee(amount: f64) -> f64 {
    if amount <= 0.0 {
        return 0.0;
    }
    let raw = if amount <= 100.0 {
        amount * 0.0075
    } else {
        amount * 0.01
    };
    round2(raw)
}

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
