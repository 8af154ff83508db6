//! Probability → credit score mapping.
//!
//! `score = round(300 + (1 - p) * 600)`, so a lower default probability yields a
//! higher score. The mapping is non-increasing in `p`.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const SCORE_MIN: u16 = 300;
pub const SCORE_MAX: u16 = 900;

/// An integer credit score, always within `[SCORE_MIN, SCORE_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditScore(u16);

impl CreditScore {
    /// Build a score, clamping into the fixed scale.
    pub fn clamped(value: u16) -> Self {
        Self(value.clamp(SCORE_MIN, SCORE_MAX))
    }

    pub fn value(self) -> u16 {
        self.0
    }

    /// Every representable score, lowest first.
    pub fn all() -> impl Iterator<Item = CreditScore> {
        (SCORE_MIN..=SCORE_MAX).map(CreditScore)
    }
}

impl fmt::Display for CreditScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreMapper;

impl ScoreMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn map_to_score(&self, probability: f64) -> CreditScore {
        // NaN lands on the bottom of the scale.
        let p = if probability.is_nan() { 1.0 } else { probability.clamp(0.0, 1.0) };
        let span = f64::from(SCORE_MAX - SCORE_MIN);
        let raw = (f64::from(SCORE_MIN) + (1.0 - p) * span).round();
        let bounded = raw.clamp(f64::from(SCORE_MIN), f64::from(SCORE_MAX));
        CreditScore::clamped(bounded as u16)
    }
}
