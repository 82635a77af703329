//! Calibratable interior constants of the fusion algorithm.
//!
//! The documented bounds (score ranges, the [1.0, 1.3] overlap clamp) are
//! hard contracts; everything here can be tuned against regression fixtures.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::types::Domain;
use crate::{
    ALIGNMENT_EXPONENT, ALIGNMENT_TERM_FLOOR, CAUTIONS_PER_DOMAIN, CONFIDENCE_MIN,
    CONFIDENCE_TARGET_MATCHES, DEFAULT_HORIZON_MONTHS, DRIVERS_PER_DOMAIN, MAX_HORIZON_MONTHS,
    OVERLAP_INCREMENT_PER_EVENT, OVERLAP_WEIGHT_CEILING, OVERLAP_WEIGHT_FLOOR, TOP_LEVEL_LABELS,
    WEIGHT_CAREER, WEIGHT_HEALTH, WEIGHT_LOVE, WEIGHT_MONEY, WEIGHT_RELOCATION,
};

/// Per-domain weights of the overall score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainWeights {
    pub career: f64,
    pub love: f64,
    pub money: f64,
    pub health: f64,
    pub relocation: f64,
}

impl Default for DomainWeights {
    fn default() -> Self {
        Self {
            career: WEIGHT_CAREER,
            love: WEIGHT_LOVE,
            money: WEIGHT_MONEY,
            health: WEIGHT_HEALTH,
            relocation: WEIGHT_RELOCATION,
        }
    }
}

impl DomainWeights {
    pub fn get(&self, domain: Domain) -> f64 {
        match domain {
            Domain::Career => self.career,
            Domain::Love => self.love,
            Domain::Money => self.money,
            Domain::Health => self.health,
            Domain::Relocation => self.relocation,
        }
    }

    pub fn sum(&self) -> f64 {
        Domain::ALL.iter().map(|d| self.get(*d)).sum()
    }
}

/// Fusion parameters. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub alignment_exponent: f64,
    pub alignment_term_floor: f64,
    pub overlap_increment_per_event: f64,
    /// Must stay within [1.0, 1.3]
    pub overlap_weight_ceiling: f64,
    pub confidence_min: f64,
    pub confidence_target_matches: usize,
    pub domain_weights: DomainWeights,
    pub horizon_months: u32,
    pub drivers_per_domain: usize,
    pub cautions_per_domain: usize,
    pub top_level_labels: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            alignment_exponent: ALIGNMENT_EXPONENT,
            alignment_term_floor: ALIGNMENT_TERM_FLOOR,
            overlap_increment_per_event: OVERLAP_INCREMENT_PER_EVENT,
            overlap_weight_ceiling: OVERLAP_WEIGHT_CEILING,
            confidence_min: CONFIDENCE_MIN,
            confidence_target_matches: CONFIDENCE_TARGET_MATCHES,
            domain_weights: DomainWeights::default(),
            horizon_months: DEFAULT_HORIZON_MONTHS,
            drivers_per_domain: DRIVERS_PER_DOMAIN,
            cautions_per_domain: CAUTIONS_PER_DOMAIN,
            top_level_labels: TOP_LEVEL_LABELS,
        }
    }
}

impl FusionConfig {
    /// Parse and validate a JSON config document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: FusionConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json_str(&json)
    }

    /// Reject values that would break the documented bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("alignment_exponent", self.alignment_exponent, 0.1, 10.0)?;
        check_range("alignment_term_floor", self.alignment_term_floor, 0.0, 1.0)?;
        check_range("overlap_increment_per_event", self.overlap_increment_per_event, 0.0, 0.3)?;
        check_range(
            "overlap_weight_ceiling",
            self.overlap_weight_ceiling,
            OVERLAP_WEIGHT_FLOOR,
            OVERLAP_WEIGHT_CEILING,
        )?;
        check_range("confidence_min", self.confidence_min, 0.0, 1.0)?;
        check_range(
            "confidence_target_matches",
            self.confidence_target_matches as f64,
            1.0,
            1000.0,
        )?;
        check_range("horizon_months", self.horizon_months as f64, 1.0, MAX_HORIZON_MONTHS as f64)?;

        for domain in Domain::ALL {
            check_range("domain_weights", self.domain_weights.get(domain), 0.0, 1.0)?;
        }
        let sum = self.domain_weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::WeightSum(sum));
        }
        Ok(())
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value, min, max })
    }
}

/// `value` when finite and within [min, max], else `fallback`. Used where an
/// unvalidated config reaches a computation with fixed bounds.
pub(crate) fn bounded_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if check_range("", value, min, max).is_ok() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(FusionConfig::default().validate(), Ok(()));
        assert!((DomainWeights::default().sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = FusionConfig::from_json_str(r#"{"overlap_increment_per_event": 0.05}"#).unwrap();
        assert_eq!(config.overlap_increment_per_event, 0.05);
        assert_eq!(config.alignment_term_floor, ALIGNMENT_TERM_FLOOR);
    }

    #[test]
    fn test_ceiling_cannot_exceed_contract() {
        let err = FusionConfig::from_json_str(r#"{"overlap_weight_ceiling": 1.5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { name: "overlap_weight_ceiling", .. }));
    }

    #[test]
    fn test_bounded_or_falls_back() {
        assert_eq!(bounded_or(0.5, 0.0, 1.0, 0.2), 0.5);
        assert_eq!(bounded_or(1.5, 0.0, 1.0, 0.2), 0.2);
        assert_eq!(bounded_or(f64::NAN, 0.0, 1.0, 0.2), 0.2);
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let json = r#"{"domain_weights": {"career": 0.5, "love": 0.5, "money": 0.5, "health": 0.0, "relocation": 0.0}}"#;
        assert!(matches!(FusionConfig::from_json_str(json), Err(ConfigError::WeightSum(_))));
    }
}
