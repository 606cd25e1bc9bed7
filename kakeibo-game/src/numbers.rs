//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Round a f64 and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Remaining-budget health as a percentage, clamped to [0, 100] for display.
///
/// The underlying budget value is never clamped; a negative `current` simply
/// reads as 0% here.
#[must_use]
pub fn budget_health_pct(current: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let ratio = i64_to_f64(current) / i64_to_f64(total);
    (ratio * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounder_handles_nan_and_overflow() {
        assert_eq!(round_f64_to_i32(1.6), 2);
        assert_eq!(round_f64_to_i32(f64::NAN), 0);
        assert_eq!(round_f64_to_i32(f64::from(i32::MAX) * 2.0), i32::MAX);
    }

    #[test]
    fn health_pct_clamps_display_only() {
        assert!((budget_health_pct(90, 100) - 90.0).abs() < 1e-9);
        assert!((budget_health_pct(-500, 100) - 0.0).abs() < 1e-9);
        assert!((budget_health_pct(150, 100) - 100.0).abs() < 1e-9);
        assert!((budget_health_pct(50, 0) - 0.0).abs() < 1e-9);
    }
}
