//! Look-back window helpers used for min/max normalization.

/// The trailing window of at most `size` values ending at `index` (inclusive).
///
/// The window is clamped at the start of the slice, never wrapped or padded.
/// `index` must be in bounds. A `size` of 0 is treated as 1.
pub fn trailing(values: &[f64], index: usize, size: usize) -> &[f64] {
    let start = (index + 1).saturating_sub(size.max(1));
    &values[start..=index]
}

/// Lowest value of the trailing window ending at `index`.
pub fn window_min(values: &[f64], index: usize, size: usize) -> f64 {
    trailing(values, index, size)
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min)
}

/// Highest value of the trailing window ending at `index`.
pub fn window_max(values: &[f64], index: usize, size: usize) -> f64 {
    trailing(values, index, size)
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
}

/// `(min, max)` of the trailing window ending at `index`.
pub fn window_min_max(values: &[f64], index: usize, size: usize) -> (f64, f64) {
    trailing(values, index, size)
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Position of `value` inside `[low, high]` scaled to 0-100, or 50 for a flat range.
pub fn relative_position(value: f64, low: f64, high: f64) -> f64 {
    if high == low {
        50.0
    } else {
        (value - low) / (high - low) * 100.0
    }
}
