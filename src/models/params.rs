//! Trained model parameters.
//!
//! `ModelArtifact` mirrors the persisted JSON one-to-one. `ModelParameters` is
//! the validated, immutable form the engine borrows: once constructed, the
//! feature order, weights, scaling statistics, vocabularies and band table are
//! mutually consistent and never change.
//!
//! Artifact schema:
//!
//! ```json
//! {
//!   "name": "illustrative-logit",
//!   "trained_on": "2025-01-15",
//!   "intercept": -1.5,
//!   "features": [
//!     { "key": "loan_to_income_ratio", "weight": 0.8 },
//!     { "key": "age", "weight": -0.2, "scaling": { "min": 18, "max": 100 } },
//!     { "key": "loan_type=unsecured", "weight": 0.3 }
//!   ],
//!   "vocabularies": {
//!     "residence_type": { "baseline": "owned", "categories": ["owned", "rented", "mortgage"] },
//!     "loan_purpose": { "baseline": "education", "categories": ["education", "home", "auto", "personal"] },
//!     "loan_type": { "baseline": "secured", "categories": ["unsecured", "secured"] }
//!   },
//!   "score_bands": [
//!     { "label": "Poor", "lower": 300 },
//!     { "label": "Average", "lower": 580 },
//!     { "label": "Good", "lower": 670 },
//!     { "label": "Excellent", "lower": 740 }
//!   ]
//! }
//! ```

use std::collections::HashSet;

use chrono::NaiveDate;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::domain::{Categorical, LoanPurpose, LoanType, ResidenceType};
use crate::error::ModelLoadError;
use crate::features::{CategoryValue, FeatureKey};
use crate::scoring::rating::{ScoreBand, ScoreBandTable};

/// Training-time bounds for min-max scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

/// One feature column: its key, weight and optional scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub key: FeatureKey,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<MinMax>,
}

/// Known categories of one attribute and its zero-contribution baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary<C> {
    pub baseline: C,
    pub categories: Vec<C>,
}

impl<C> Vocabulary<C>
where
    C: Categorical + Into<CategoryValue>,
{
    /// Every category of the attribute, baseline first in declaration order.
    #[cfg(test)]
    pub(crate) fn full() -> Self {
        Self {
            baseline: C::ALL[0],
            categories: C::ALL.to_vec(),
        }
    }

    pub fn contains(&self, category: C) -> bool {
        self.categories.contains(&category)
    }

    /// Non-baseline categories, each of which owns an indicator column.
    pub fn indicator_categories(&self) -> impl Iterator<Item = C> + '_ {
        self.categories.iter().copied().filter(|c| *c != self.baseline)
    }

    fn validate(&self, declared: &HashSet<FeatureKey>) -> Result<(), ModelLoadError> {
        let attribute = C::ATTRIBUTE;
        if self.categories.is_empty() {
            return Err(ModelLoadError::EmptyVocabulary { attribute });
        }

        let mut seen = Vec::with_capacity(self.categories.len());
        for &category in &self.categories {
            if seen.contains(&category) {
                return Err(ModelLoadError::DuplicateCategory {
                    attribute,
                    category: category.key().to_string(),
                });
            }
            seen.push(category);
        }

        if !self.contains(self.baseline) {
            return Err(ModelLoadError::BaselineOutsideVocabulary {
                attribute,
                baseline: self.baseline.key().to_string(),
            });
        }

        for category in self.indicator_categories() {
            if !declared.contains(&FeatureKey::Indicator(category.into())) {
                return Err(ModelLoadError::MissingIndicator {
                    attribute,
                    category: category.key().to_string(),
                });
            }
        }

        Ok(())
    }

    fn owns_indicator(&self, category: C) -> bool {
        category != self.baseline && self.contains(category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabularies {
    pub residence_type: Vocabulary<ResidenceType>,
    pub loan_purpose: Vocabulary<LoanPurpose>,
    pub loan_type: Vocabulary<LoanType>,
}

impl Vocabularies {
    fn owns_indicator(&self, value: CategoryValue) -> bool {
        match value {
            CategoryValue::Residence(c) => self.residence_type.owns_indicator(c),
            CategoryValue::Purpose(c) => self.loan_purpose.owns_indicator(c),
            CategoryValue::LoanType(c) => self.loan_type.owns_indicator(c),
        }
    }
}

/// The persisted artifact, as deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_on: Option<NaiveDate>,
    pub intercept: f64,
    pub features: Vec<FeatureSpec>,
    pub vocabularies: Vocabularies,
    pub score_bands: Vec<ScoreBand>,
}

/// Validated, immutable model parameters.
#[derive(Debug, Clone)]
pub struct ModelParameters {
    name: String,
    trained_on: Option<NaiveDate>,
    intercept: f64,
    features: Vec<FeatureSpec>,
    weights: DVector<f64>,
    vocabularies: Vocabularies,
    bands: ScoreBandTable,
}

impl ModelParameters {
    /// Parse and validate an artifact from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ModelLoadError> {
        let artifact: ModelArtifact = serde_json::from_str(json).map_err(|source| ModelLoadError::Json {
            origin: "(inline)".to_string(),
            source,
        })?;
        Self::try_from(artifact)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trained_on(&self) -> Option<NaiveDate> {
        self.trained_on
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Feature columns in model order.
    pub fn features(&self) -> &[FeatureSpec] {
        &self.features
    }

    pub fn weights(&self) -> &DVector<f64> {
        &self.weights
    }

    pub fn vocabularies(&self) -> &Vocabularies {
        &self.vocabularies
    }

    pub fn bands(&self) -> &ScoreBandTable {
        &self.bands
    }
}

impl TryFrom<ModelArtifact> for ModelParameters {
    type Error = ModelLoadError;

    fn try_from(artifact: ModelArtifact) -> Result<Self, Self::Error> {
        if artifact.features.is_empty() {
            return Err(ModelLoadError::NoFeatures);
        }
        if !artifact.intercept.is_finite() {
            return Err(ModelLoadError::NonFiniteIntercept);
        }

        let mut declared = HashSet::with_capacity(artifact.features.len());
        for spec in &artifact.features {
            if !declared.insert(spec.key) {
                return Err(ModelLoadError::DuplicateFeature(spec.key));
            }
            if !spec.weight.is_finite() {
                return Err(ModelLoadError::NonFiniteWeight(spec.key));
            }
            if let Some(MinMax { min, max }) = spec.scaling {
                if spec.key.is_indicator() {
                    return Err(ModelLoadError::ScaledIndicator(spec.key));
                }
                if !(min.is_finite() && max.is_finite() && max > min) {
                    return Err(ModelLoadError::InvalidScaling {
                        feature: spec.key,
                        min,
                        max,
                    });
                }
            }
            if let FeatureKey::Indicator(value) = spec.key {
                if !artifact.vocabularies.owns_indicator(value) {
                    return Err(ModelLoadError::StrayIndicator(spec.key));
                }
            }
        }

        artifact.vocabularies.residence_type.validate(&declared)?;
        artifact.vocabularies.loan_purpose.validate(&declared)?;
        artifact.vocabularies.loan_type.validate(&declared)?;

        let bands = ScoreBandTable::new(artifact.score_bands)?;
        let weights = DVector::from_iterator(artifact.features.len(), artifact.features.iter().map(|f| f.weight));

        Ok(Self {
            name: artifact.name,
            trained_on: artifact.trained_on,
            intercept: artifact.intercept,
            features: artifact.features,
            weights,
            vocabularies: artifact.vocabularies,
            bands,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{illustrative, illustrative_artifact};
    use super::*;
    use crate::features::NumericFeature;

    #[test]
    fn illustrative_artifact_validates() {
        let params = illustrative();
        assert_eq!(params.name(), "illustrative-logit");
        assert_eq!(params.features().len(), 11);
        assert_eq!(params.weights().len(), 11);
        assert_eq!(params.intercept(), -1.5);
        assert_eq!(params.bands().bands().len(), 4);
    }

    #[test]
    fn json_round_trip_preserves_feature_order() {
        let json = serde_json::to_string_pretty(&illustrative_artifact()).unwrap();
        let params = ModelParameters::from_json_str(&json).unwrap();
        let keys: Vec<String> = params.features().iter().map(|f| f.key.to_string()).collect();
        assert_eq!(keys[0], "loan_to_income_ratio");
        assert_eq!(keys[10], "loan_type=unsecured");
    }

    #[test]
    fn rejects_structurally_invalid_artifacts() {
        let mut artifact = illustrative_artifact();
        artifact.features.clear();
        assert!(matches!(ModelParameters::try_from(artifact), Err(ModelLoadError::NoFeatures)));

        let mut artifact = illustrative_artifact();
        artifact.intercept = f64::NAN;
        assert!(matches!(ModelParameters::try_from(artifact), Err(ModelLoadError::NonFiniteIntercept)));

        let mut artifact = illustrative_artifact();
        let first = artifact.features[0].clone();
        artifact.features.push(first);
        assert!(matches!(ModelParameters::try_from(artifact), Err(ModelLoadError::DuplicateFeature(_))));

        let mut artifact = illustrative_artifact();
        artifact.features[1].weight = f64::INFINITY;
        assert!(matches!(ModelParameters::try_from(artifact), Err(ModelLoadError::NonFiniteWeight(_))));
    }

    #[test]
    fn rejects_bad_scaling() {
        let mut artifact = illustrative_artifact();
        artifact.features[0].scaling = Some(MinMax { min: 5.0, max: 5.0 });
        assert!(matches!(ModelParameters::try_from(artifact), Err(ModelLoadError::InvalidScaling { .. })));

        let mut artifact = illustrative_artifact();
        artifact.features[10].scaling = Some(MinMax { min: 0.0, max: 1.0 });
        assert!(matches!(ModelParameters::try_from(artifact), Err(ModelLoadError::ScaledIndicator(_))));
    }

    #[test]
    fn rejects_inconsistent_vocabularies() {
        // Rented is in the vocabulary but has no indicator column.
        let mut artifact = illustrative_artifact();
        artifact.features.retain(|f| f.key.to_string() != "residence_type=rented");
        assert!(matches!(ModelParameters::try_from(artifact), Err(ModelLoadError::MissingIndicator { .. })));

        // Indicator for the baseline category.
        let mut artifact = illustrative_artifact();
        artifact.features.push(FeatureSpec {
            key: FeatureKey::Indicator(CategoryValue::LoanType(LoanType::Secured)),
            weight: 0.1,
            scaling: None,
        });
        assert!(matches!(ModelParameters::try_from(artifact), Err(ModelLoadError::StrayIndicator(_))));

        let mut artifact = illustrative_artifact();
        artifact.vocabularies.loan_type.baseline = LoanType::Unsecured;
        artifact.vocabularies.loan_type.categories = vec![LoanType::Secured];
        assert!(matches!(
            ModelParameters::try_from(artifact),
            Err(ModelLoadError::StrayIndicator(_)) | Err(ModelLoadError::BaselineOutsideVocabulary { .. })
        ));

        let mut artifact = illustrative_artifact();
        artifact.vocabularies.residence_type.categories.push(ResidenceType::Owned);
        assert!(matches!(ModelParameters::try_from(artifact), Err(ModelLoadError::DuplicateCategory { .. })));
    }

    #[test]
    fn rejects_unknown_feature_key_in_json() {
        let json = serde_json::to_string(&illustrative_artifact())
            .unwrap()
            .replace("\"avg_dpd_per_delinquency\"", "\"avg_dpd\"");
        assert!(matches!(ModelParameters::from_json_str(&json), Err(ModelLoadError::Json { .. })));
    }

    #[test]
    fn scaled_continuous_feature_is_accepted() {
        let mut artifact = illustrative_artifact();
        artifact.features.push(FeatureSpec {
            key: FeatureKey::Numeric(NumericFeature::Age),
            weight: -0.2,
            scaling: Some(MinMax { min: 18.0, max: 100.0 }),
        });
        assert!(ModelParameters::try_from(artifact).is_ok());
    }
}
