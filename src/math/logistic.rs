//! Numerically stable logistic transform.
//!
//! `σ(z) = 1 / (1 + e^{-z})`
//!
//! Numerical notes:
//! - For large negative `z`, `e^{-z}` overflows to `+inf`; the textbook form still
//!   returns `0.0`, but intermediate infinities are easy to mishandle downstream.
//!   We evaluate the mirrored form `e^{z} / (1 + e^{z})` for `z < 0` so the
//!   exponent argument is never positive.
//! - The result is always in the closed interval `[0, 1]` for any non-NaN `z`,
//!   including `±inf`.

/// Logistic (sigmoid) function.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
