//! Matrix engine
//!
//! validate → resolve anchor → per-domain time overlap and score →
//! timelines → weighted overall score, grade and top-level labels.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::FusionConfig;
use crate::core::overlap::{ActiveCells, TimeOverlapCalculator};
use crate::core::scoring::DomainScorer;
use crate::core::tables::{TableRegistry, TableSet};
use crate::core::timeline::TimelineBuilder;
use crate::core::validate::{resolve_anchor, validate_horizon, validate_input, validate_span};
use crate::error::{ConfigError, ValidationFailure};
use crate::types::{Domain, DomainScore, Grade, MatrixInput, MatrixResult, YearMonth};
use crate::{DOMAIN_SCORE_MAX, DOMAIN_SCORE_MIN};

/// Fusion engine bound to one table set and config.
///
/// Holds only shared read-only state; one engine can serve any number of
/// threads.
#[derive(Debug, Clone)]
pub struct MatrixEngine {
    tables: Arc<TableSet>,
    config: FusionConfig,
}

impl MatrixEngine {
    /// Bind `tables` and a config that passes `FusionConfig::validate`
    pub fn new(tables: Arc<TableSet>, config: FusionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { tables, config })
    }

    /// Process-wide tables, default config
    pub fn with_defaults() -> Self {
        Self {
            tables: TableRegistry::current(),
            config: FusionConfig::default(),
        }
    }

    pub fn tables(&self) -> &TableSet {
        &self.tables
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Score an input. Reads the clock only when the input has no anchor.
    pub fn calculate(&self, input: &MatrixInput) -> Result<MatrixResult, ValidationFailure> {
        self.run(input, YearMonth::current)
    }

    /// Score an input, using `fallback_anchor` when the input has no anchor
    pub fn calculate_at(
        &self,
        input: &MatrixInput,
        fallback_anchor: YearMonth,
    ) -> Result<MatrixResult, ValidationFailure> {
        self.run(input, || fallback_anchor)
    }

    fn run(
        &self,
        input: &MatrixInput,
        fallback_anchor: impl FnOnce() -> YearMonth,
    ) -> Result<MatrixResult, ValidationFailure> {
        let anchor = self.validate(input)?.unwrap_or_else(fallback_anchor);
        let horizon = self.config.horizon_months;
        validate_span(anchor, horizon).map_err(|issue| ValidationFailure::new(vec![issue]))?;

        // Domain scores at the anchor month
        let cells = ActiveCells::from_input(input);
        let overlap = TimeOverlapCalculator::new(&self.tables, &self.config);
        let scorer = DomainScorer::new(&self.tables, &self.config);
        let domain_scores: BTreeMap<Domain, DomainScore> = Domain::ALL
            .iter()
            .map(|domain| {
                let time = overlap.calculate(&cells.saju, &cells.astro, *domain);
                (*domain, scorer.score(input, *domain, time))
            })
            .collect();

        let timelines = TimelineBuilder::new(&self.tables, &self.config).build(input, anchor, horizon);

        let overall_score = self.overall_score(&domain_scores);
        let grade = Grade::from_score(overall_score);
        let limit = self.config.top_level_labels;
        let drivers = top_labels(&domain_scores, limit, true);
        let cautions = top_labels(&domain_scores, limit, false);

        debug!(
            anchor = %anchor,
            horizon,
            overall_score,
            grade = %grade,
            table_version = %self.tables.version(),
            "matrix calculated"
        );

        Ok(MatrixResult {
            overall_score,
            grade,
            domain_scores,
            overlap_timeline: timelines.overall,
            overlap_timeline_by_domain: timelines.by_domain,
            drivers,
            cautions,
            table_version: self.tables.version().to_string(),
            table_digest: self.tables.digest_hex(),
            input_digest: input_digest(input),
        })
    }

    /// All input checks plus the configured horizon; the input's anchor on success
    fn validate(&self, input: &MatrixInput) -> Result<Option<YearMonth>, ValidationFailure> {
        let mut issues = match validate_input(input) {
            Ok(()) => Vec::new(),
            Err(failure) => failure.issues,
        };
        if let Err(issue) = validate_horizon(self.config.horizon_months) {
            issues.push(issue);
        }
        if !issues.is_empty() {
            let failure = ValidationFailure::new(issues);
            warn!(issues = failure.issues.len(), "{}", failure);
            return Err(failure);
        }
        resolve_anchor(input).map_err(|issue| ValidationFailure::new(vec![issue]))
    }

    /// Weighted mean of the adjusted domain scores
    fn overall_score(&self, scores: &BTreeMap<Domain, DomainScore>) -> f64 {
        let weights = &self.config.domain_weights;
        let (sum, total) = scores.iter().fold((0.0, 0.0), |(sum, total), (domain, score)| {
            let w = weights.get(*domain);
            (sum + w * score.final_score_adjusted, total + w)
        });
        if total > 0.0 {
            (sum / total).clamp(DOMAIN_SCORE_MIN, DOMAIN_SCORE_MAX)
        } else {
            crate::NEUTRAL_BASE_SCORE
        }
    }
}

/// Union of the domain labels, deduplicated. Drivers come from the strongest
/// domains first, cautions from the weakest.
fn top_labels(scores: &BTreeMap<Domain, DomainScore>, limit: usize, drivers: bool) -> Vec<String> {
    let mut ranked: Vec<&DomainScore> = scores.values().collect();
    ranked.sort_by(|a, b| {
        let by_score = if drivers {
            b.final_score_adjusted.total_cmp(&a.final_score_adjusted)
        } else {
            a.final_score_adjusted.total_cmp(&b.final_score_adjusted)
        };
        by_score.then(a.domain.cmp(&b.domain))
    });

    let mut labels: Vec<String> = Vec::new();
    for score in ranked {
        let source = if drivers { &score.drivers } else { &score.cautions };
        for label in source {
            if labels.len() == limit {
                return labels;
            }
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
    }
    labels
}

/// Score an input against the process-wide tables with the default config
pub fn calculate_destiny_matrix(input: &MatrixInput) -> Result<MatrixResult, ValidationFailure> {
    MatrixEngine::with_defaults().calculate(input)
}

/// Hex SHA-256 of the input's canonical JSON, usable as a cache key
pub fn input_digest(input: &MatrixInput) -> String {
    // ordered maps make the JSON canonical; plain data cannot fail to serialize
    let canonical = serde_json::to_vec(input).unwrap_or_default();
    Sha256::digest(&canonical)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DomainWeights;
    use crate::types::{Element, ValidationReason};

    fn engine() -> MatrixEngine {
        MatrixEngine::new(Arc::new(TableSet::builtin().unwrap()), FusionConfig::default()).unwrap()
    }

    fn anchor() -> YearMonth {
        "2025-03".parse().unwrap()
    }

    #[test]
    fn test_every_domain_scored() {
        let input = MatrixInput::new(Element::Fire, [Element::Fire, Element::Water, Element::Wood, Element::Earth]);
        let result = engine().calculate_at(&input, anchor()).unwrap();
        assert_eq!(result.domain_scores.len(), 5);
        assert_eq!(result.overlap_timeline.len(), 12);
        assert_eq!(result.overlap_timeline[0].month, anchor());
        assert!(result.drivers.len() <= 5);
        assert!(result.cautions.len() <= 5);
    }

    #[test]
    fn test_rejects_missing_fields() {
        let err = engine().calculate_at(&MatrixInput::default(), anchor()).unwrap_err();
        assert!(err.has(ValidationReason::R101_MISSING_DAY_MASTER));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let tables = Arc::new(TableSet::builtin().unwrap());
        let config = FusionConfig { horizon_months: 0, ..FusionConfig::default() };
        let err = MatrixEngine::new(Arc::clone(&tables), config).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { name: "horizon_months", .. }));

        let config = FusionConfig { confidence_min: 1.5, ..FusionConfig::default() };
        let err = MatrixEngine::new(Arc::clone(&tables), config).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { name: "confidence_min", .. }));

        let mut config = FusionConfig::default();
        config.domain_weights = DomainWeights { career: 0.0, love: 0.0, money: 0.0, health: 0.0, relocation: 0.0 };
        assert!(matches!(MatrixEngine::new(tables, config), Err(ConfigError::WeightSum(_))));
    }

    #[test]
    fn test_input_anchor_wins_over_fallback() {
        let mut input = MatrixInput::new(Element::Wood, [Element::Wood; 4]);
        input.anchor_month = Some("2030-01".to_string());
        let result = engine().calculate_at(&input, anchor()).unwrap();
        assert_eq!(result.overlap_timeline[0].month.to_string(), "2030-01");
    }

    #[test]
    fn test_timeline_may_not_pass_9999_12() {
        let mut input = MatrixInput::new(Element::Wood, [Element::Wood; 4]);
        input.anchor_month = Some("9999-08".to_string());
        let err = engine().calculate_at(&input, anchor()).unwrap_err();
        assert!(err.has(ValidationReason::R108_INVALID_HORIZON));

        input.anchor_month = Some("9999-01".to_string());
        let result = engine().calculate_at(&input, anchor()).unwrap();
        assert_eq!(result.overlap_timeline[11].month.to_string(), "9999-12");
        let json = serde_json::to_string(&result).unwrap();
        let back: MatrixResult = serde_json::from_str(&json).unwrap();
        let months = |r: &MatrixResult| r.overlap_timeline.iter().map(|p| p.month).collect::<Vec<_>>();
        assert_eq!(months(&back), months(&result));
    }

    #[test]
    fn test_input_digest_stable() {
        let a = MatrixInput::new(Element::Wood, [Element::Wood; 4]);
        let mut b = a.clone();
        assert_eq!(input_digest(&a), input_digest(&b));
        b.active_transits.insert("eclipse".to_string());
        assert_ne!(input_digest(&a), input_digest(&b));
        assert_eq!(input_digest(&a).len(), 64);
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MatrixEngine>();
    }
}
