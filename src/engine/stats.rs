// ==========================================
// Tupacery Reports - Statistics Helpers
// ==========================================
// Shared by every aggregator. No helper returns NaN or infinity:
// ratios fall back to 0, distribution stats to None.
// ==========================================

/// Trailing mean over up to `window` values, min period 1
///
/// # Example
/// `[100, 200, 300]` with window 7 -> `[100, 150, 200]`
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            mean_of(&values[start..=i])
        })
        .collect()
}

/// Last value of the rolling mean; 0 for an empty series
pub fn last_rolling_mean(values: &[f64], window: usize) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let window = window.max(1);
    let tail = &values[values.len().saturating_sub(window)..];
    finite_or_zero(tail.iter().sum::<f64>() / tail.len() as f64)
}

/// Last `window` values against the `window` before them, in %
///
/// Exactly 0 with fewer than `2 * window` values or a non-positive
/// previous mean.
pub fn week_over_week_pct(values: &[f64], window: usize) -> f64 {
    let window = window.max(1);
    if values.len() < 2 * window {
        return 0.0;
    }
    let n = values.len();
    let last = mean_of(&values[n - window..]);
    let previous = mean_of(&values[n - 2 * window..n - window]);
    if previous <= 0.0 {
        return 0.0;
    }
    finite_or_zero((last - previous) / previous * 100.0)
}

/// num / den, 0 when the denominator is 0
pub fn safe_div(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        finite_or_zero(num / den)
    }
}

/// num / den * 100, 0 when the denominator is 0
pub fn pct(num: f64, den: f64) -> f64 {
    safe_div(num, den) * 100.0
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// ==========================================
// Distribution statistics (None when not available)
// ==========================================

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(mean_of(values))
    }
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation (n - 1); needs two values
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean_of(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// std / mean * 100; None when the mean is 0 or std is unavailable
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let std = sample_std(values)?;
    let m = mean(values)?;
    if m == 0.0 {
        return None;
    }
    Some(std / m * 100.0).filter(|cv| cv.is_finite())
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}
