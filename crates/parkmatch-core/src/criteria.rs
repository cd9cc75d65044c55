//! Tunable thresholds and weights for the location matcher.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Matching thresholds, scoring bonuses, and cluster confidence rubric.
///
/// Every field has a default; a YAML file only needs to name the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchCriteria {
    pub minimum_name_similarity: f64,
    pub strong_name_similarity: f64,
    pub minimum_address_similarity: f64,
    pub strong_address_similarity: f64,
    pub maximum_distance_meters: f64,
    pub same_location_distance_meters: f64,
    pub maximum_price_difference_ratio: f64,
    /// When `false`, price neither adds a bonus nor rejects a pair.
    pub consider_price_in_matching: bool,
    pub base_confidence_score: f64,
    /// Added per corroborating member beyond the first.
    pub provider_count_bonus: f64,
    pub coordinate_data_bonus: f64,
    pub complete_address_bonus: f64,
    pub same_address_bonus: f64,
    pub minimum_match_confidence: f64,
    pub excellent_match_threshold: f64,
}

impl Default for MatchCriteria {
    fn default() -> Self {
        Self {
            minimum_name_similarity: 0.4,
            strong_name_similarity: 0.8,
            minimum_address_similarity: 0.75,
            strong_address_similarity: 0.95,
            maximum_distance_meters: 150.0,
            same_location_distance_meters: 30.0,
            maximum_price_difference_ratio: 0.4,
            consider_price_in_matching: true,
            base_confidence_score: 0.3,
            provider_count_bonus: 0.2,
            coordinate_data_bonus: 0.1,
            complete_address_bonus: 0.05,
            same_address_bonus: 0.25,
            minimum_match_confidence: 0.7,
            excellent_match_threshold: 0.9,
        }
    }
}

impl MatchCriteria {
    /// Check that every threshold is finite and within its meaningful range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit_fields = [
            ("minimum_name_similarity", self.minimum_name_similarity),
            ("strong_name_similarity", self.strong_name_similarity),
            ("minimum_address_similarity", self.minimum_address_similarity),
            ("strong_address_similarity", self.strong_address_similarity),
            (
                "maximum_price_difference_ratio",
                self.maximum_price_difference_ratio,
            ),
            ("base_confidence_score", self.base_confidence_score),
            ("provider_count_bonus", self.provider_count_bonus),
            ("coordinate_data_bonus", self.coordinate_data_bonus),
            ("complete_address_bonus", self.complete_address_bonus),
            ("same_address_bonus", self.same_address_bonus),
            ("minimum_match_confidence", self.minimum_match_confidence),
            ("excellent_match_threshold", self.excellent_match_threshold),
        ];
        for (name, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        for (name, value) in [
            ("maximum_distance_meters", self.maximum_distance_meters),
            (
                "same_location_distance_meters",
                self.same_location_distance_meters,
            ),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{name} must be a positive distance, got {value}"
                )));
            }
        }

        if self.same_location_distance_meters > self.maximum_distance_meters {
            return Err(ConfigError::Validation(format!(
                "same_location_distance_meters ({}) exceeds maximum_distance_meters ({})",
                self.same_location_distance_meters, self.maximum_distance_meters
            )));
        }
        if self.minimum_name_similarity > self.strong_name_similarity {
            return Err(ConfigError::Validation(
                "minimum_name_similarity exceeds strong_name_similarity".to_string(),
            ));
        }
        if self.minimum_address_similarity > self.strong_address_similarity {
            return Err(ConfigError::Validation(
                "minimum_address_similarity exceeds strong_address_similarity".to_string(),
            ));
        }
        // A corroborating member without a zip drops the complete-address
        // bonus; its provider bonus must cover that loss.
        if self.provider_count_bonus < self.complete_address_bonus {
            return Err(ConfigError::Validation(format!(
                "provider_count_bonus ({}) is below complete_address_bonus ({})",
                self.provider_count_bonus, self.complete_address_bonus
            )));
        }

        Ok(())
    }
}

/// Load match criteria from a YAML file, filling unspecified keys with defaults.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_criteria(path: &Path) -> Result<MatchCriteria, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CriteriaFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_criteria(&content)
}

/// Parse and validate match criteria from YAML text.
///
/// # Errors
///
/// Returns [`ConfigError::CriteriaFileParse`] on malformed YAML and
/// [`ConfigError::Validation`] on out-of-range values.
pub fn parse_criteria(yaml: &str) -> Result<MatchCriteria, ConfigError> {
    // An empty document deserializes to unit, not to a defaulted struct.
    let criteria: MatchCriteria = if yaml.trim().is_empty() {
        MatchCriteria::default()
    } else {
        serde_yaml::from_str(yaml).map_err(ConfigError::CriteriaFileParse)?
    };
    criteria.validate()?;
    Ok(criteria)
}
