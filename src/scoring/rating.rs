//! Score → rating lookup.
//!
//! The band table partitions `[SCORE_MIN, SCORE_MAX]`: each band covers
//! `[lower, next.lower)` and the top band runs to `SCORE_MAX` inclusive. The
//! table is validated when the artifact loads, so lookup is total.

use serde::{Deserialize, Serialize};

use crate::domain::Rating;
use crate::error::ModelLoadError;
use crate::scoring::score::{CreditScore, SCORE_MAX, SCORE_MIN};

/// One row of the band table as stored in the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBand {
    pub label: Rating,
    pub lower: u16,
}

/// Validated, ordered band table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBandTable {
    bands: Vec<ScoreBand>,
}

impl ScoreBandTable {
    pub fn new(bands: Vec<ScoreBand>) -> Result<Self, ModelLoadError> {
        let first = bands.first().ok_or(ModelLoadError::EmptyBands)?;
        if first.lower != SCORE_MIN {
            return Err(ModelLoadError::BandsStartAbove {
                lower: first.lower,
                expected: SCORE_MIN,
            });
        }

        for pair in bands.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.lower <= prev.lower {
                return Err(ModelLoadError::BandsNotAscending {
                    previous: prev.lower,
                    next: next.lower,
                });
            }
            if next.label <= prev.label {
                return Err(ModelLoadError::BandLabelsOutOfOrder {
                    previous: prev.label.to_string(),
                    next: next.label.to_string(),
                });
            }
        }

        if let Some(last) = bands.last() {
            if last.lower > SCORE_MAX {
                return Err(ModelLoadError::BandAboveScale {
                    lower: last.lower,
                    max: SCORE_MAX,
                });
            }
        }

        Ok(Self { bands })
    }

    /// The conventional four-band table.
    #[cfg(test)]
    pub(crate) fn standard() -> Self {
        Self {
            bands: vec![
                ScoreBand { label: Rating::Poor, lower: 300 },
                ScoreBand { label: Rating::Average, lower: 580 },
                ScoreBand { label: Rating::Good, lower: 670 },
                ScoreBand { label: Rating::Excellent, lower: 740 },
            ],
        }
    }

    pub fn bands(&self) -> &[ScoreBand] {
        &self.bands
    }

    /// Inclusive upper edge of the band at `index`.
    pub fn upper_inclusive(&self, index: usize) -> u16 {
        self.bands
            .get(index + 1)
            .map(|next| next.lower - 1)
            .unwrap_or(SCORE_MAX)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RatingClassifier<'a> {
    table: &'a ScoreBandTable,
}

impl<'a> RatingClassifier<'a> {
    pub fn new(table: &'a ScoreBandTable) -> Self {
        Self { table }
    }

    pub fn classify(&self, score: CreditScore) -> Rating {
        let bands = self.table.bands();
        // Bands whose lower edge is <= score; the first band starts at SCORE_MIN so
        // this is never zero for a valid score.
        let idx = bands.partition_point(|b| b.lower <= score.value());
        bands[idx.saturating_sub(1)].label
    }
}
