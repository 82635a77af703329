//! Life domains and their scores

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::{InteractionLevel, Layer, ValidationReason};

/// The five fixed life domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Career,
    Love,
    Money,
    Health,
    Relocation,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Career,
        Domain::Love,
        Domain::Money,
        Domain::Health,
        Domain::Relocation,
    ];

    /// Table key
    pub fn key(&self) -> &'static str {
        match self {
            Domain::Career => "career",
            Domain::Love => "love",
            Domain::Money => "money",
            Domain::Health => "health",
            Domain::Relocation => "relocation",
        }
    }

    /// Title for reports and calendar events
    pub fn title(&self) -> &'static str {
        match self {
            Domain::Career => "Career",
            Domain::Love => "Love",
            Domain::Money => "Money",
            Domain::Health => "Health",
            Domain::Relocation => "Relocation",
        }
    }
}

impl FromStr for Domain {
    type Err = ValidationReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "career" => Ok(Domain::Career),
            "love" => Ok(Domain::Love),
            "money" | "wealth" => Ok(Domain::Money),
            "health" => Ok(Domain::Health),
            "relocation" | "move" => Ok(Domain::Relocation),
            _ => Err(ValidationReason::R107_UNKNOWN_DOMAIN),
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Which table lookup a driver or caution came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// The label as it appears in drivers/cautions
    pub label: String,
    pub layer: Layer,
    pub key_a: String,
    pub key_b: String,
    pub level: InteractionLevel,
    pub score: u8,
}

/// Fused score of one domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainScore {
    pub domain: Domain,
    /// Weighted mean of resolved codes on 0..=100, 50 when none resolved
    pub base_final_score: f64,
    /// base × alignment_term × time_overlap_weight, clamped to 0..=100
    pub final_score_adjusted: f64,
    /// Same matches weighted by Four Pillars prominence
    pub saju_component_score: f64,
    /// Same matches weighted by chart prominence
    pub astro_component_score: f64,
    /// 0..=1
    pub alignment_score: f64,
    /// Multiplier derived from alignment_score
    pub alignment_term: f64,
    pub overlap_strength: f64,
    /// 1.0..=1.3
    pub time_overlap_weight: f64,
    /// 0..=1
    pub confidence_score: f64,
    /// Number of lookups that resolved
    pub matched_count: usize,
    pub drivers: Vec<String>,
    pub cautions: Vec<String>,
    /// Lookups behind drivers then cautions, in list order
    pub evidence: Vec<Evidence>,
}

impl DomainScore {
    /// Plain one-line summary
    pub fn to_parseable_string(&self) -> String {
        format!(
            "{}: final={:.1} | base={:.1} | align={:.3} | overlap={:.3} | confidence={:.2}",
            self.domain,
            self.final_score_adjusted,
            self.base_final_score,
            self.alignment_score,
            self.time_overlap_weight,
            self.confidence_score,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_parse() {
        assert_eq!("Career".parse::<Domain>(), Ok(Domain::Career));
        assert_eq!("wealth".parse::<Domain>(), Ok(Domain::Money));
        assert_eq!(
            "fame".parse::<Domain>(),
            Err(ValidationReason::R107_UNKNOWN_DOMAIN)
        );
    }

    #[test]
    fn test_domain_order_is_fixed() {
        let mut shuffled = vec![Domain::Health, Domain::Career, Domain::Relocation, Domain::Love, Domain::Money];
        shuffled.sort();
        assert_eq!(shuffled, Domain::ALL.to_vec());
    }
}
