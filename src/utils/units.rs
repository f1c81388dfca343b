//! Unit conversion utilities

/// Convert degrees Fahrenheit to degrees Celsius
#[inline]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Convert a duration in days, hours, minutes and seconds to seconds.
/// Returns None if the total does not fit in a u64.
#[inline]
pub fn dhms_to_seconds(days: u64, hours: u64, minutes: u64, seconds: u64) -> Option<f64> {
    days.checked_mul(86_400)?
        .checked_add(hours.checked_mul(3_600)?)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
        .map(|total| total as f64)
}
