//! Feature scaling helpers.

/// Min-max scale `raw` into `[0, 1]` using training-time bounds.
///
/// Values outside the training range are clamped rather than rejected.
/// Callers guarantee `max > min` (checked when the artifact is loaded).
pub fn min_max_scale(raw: f64, min: f64, max: f64) -> f64 {
    ((raw - min) / (max - min)).clamp(0.0, 1.0)
}

/// `numerator / denominator`, or `0.0` when the denominator is not positive.
///
/// The quotient saturates at `±f64::MAX`, so a subnormal denominator never
/// yields an infinity.
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        (numerator / denominator).clamp(-f64::MAX, f64::MAX)
    } else {
        0.0
    }
}
