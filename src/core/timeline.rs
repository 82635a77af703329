//! Overlap timeline: time overlap projected month by month from the anchor.
//!
//! Events decay across their activity windows and the year-cycle element
//! drops out once the anchor's calendar year ends. Every point is a pure
//! function of (input, tables, config, anchor, offset).

use std::collections::BTreeMap;

use crate::config::{DomainWeights, FusionConfig};
use crate::core::overlap::{ActiveCells, TimeOverlapCalculator};
use crate::core::tables::{TableRegistry, TableSet};
use crate::core::validate::{resolve_anchor, validate_horizon, validate_span};
use crate::error::ValidationFailure;
use crate::types::{Domain, MatrixInput, OverlapTimelinePoint, PeakLevel, YearMonth};
use crate::{OVERLAP_WEIGHT_CEILING, OVERLAP_WEIGHT_FLOOR};

/// Domain-weighted timeline plus one timeline per domain
#[derive(Debug, Clone, PartialEq)]
pub struct Timelines {
    pub overall: Vec<OverlapTimelinePoint>,
    pub by_domain: BTreeMap<Domain, Vec<OverlapTimelinePoint>>,
}

/// Builds timelines against one table set and config
#[derive(Debug, Clone, Copy)]
pub struct TimelineBuilder<'a> {
    calculator: TimeOverlapCalculator<'a>,
    config: &'a FusionConfig,
}

impl<'a> TimelineBuilder<'a> {
    pub fn new(tables: &'a TableSet, config: &'a FusionConfig) -> Self {
        Self {
            calculator: TimeOverlapCalculator::new(tables, config),
            config,
        }
    }

    /// Overlap of `domain` for each month in `anchor .. anchor + horizon`.
    /// Stops early at 9999-12.
    pub fn domain_timeline(
        &self,
        input: &MatrixInput,
        domain: Domain,
        anchor: YearMonth,
        horizon_months: u32,
    ) -> Vec<OverlapTimelinePoint> {
        months(anchor, horizon_months)
            .zip(0u32..)
            .map(|(month, offset)| {
                let cells = ActiveCells::at_month_offset(input, offset, month.year() == anchor.year());
                let overlap = self.calculator.calculate(&cells.saju, &cells.astro, domain);
                point(month, overlap.overlap_strength, overlap.time_overlap_weight)
            })
            .collect()
    }

    /// Every domain timeline and their weighted combination
    pub fn build(&self, input: &MatrixInput, anchor: YearMonth, horizon_months: u32) -> Timelines {
        let by_domain: BTreeMap<Domain, Vec<OverlapTimelinePoint>> = Domain::ALL
            .iter()
            .map(|domain| (*domain, self.domain_timeline(input, *domain, anchor, horizon_months)))
            .collect();

        let shares = domain_shares(&self.config.domain_weights);
        let overall = months(anchor, horizon_months)
            .enumerate()
            .map(|(i, month)| {
                let (strength, weight) = by_domain.iter().fold((0.0, 0.0), |(s, w), (domain, points)| {
                    let share = shares[domain];
                    (s + share * points[i].overlap_strength, w + share * points[i].time_overlap_weight)
                });
                let weight = weight.clamp(OVERLAP_WEIGHT_FLOOR, OVERLAP_WEIGHT_CEILING);
                point(month, strength, weight)
            })
            .collect();

        Timelines { overall, by_domain }
    }
}

fn months(anchor: YearMonth, horizon_months: u32) -> impl Iterator<Item = YearMonth> {
    std::iter::successors(Some(anchor), YearMonth::succ).take(horizon_months as usize)
}

/// Normalized domain weights; equal shares when the weights cannot be
/// normalized
fn domain_shares(weights: &DomainWeights) -> BTreeMap<Domain, f64> {
    let usable = Domain::ALL.iter().all(|d| weights.get(*d).is_finite() && weights.get(*d) >= 0.0);
    let total = weights.sum();
    Domain::ALL
        .iter()
        .map(|domain| {
            let share = if usable && total > 0.0 {
                weights.get(*domain) / total
            } else {
                1.0 / Domain::ALL.len() as f64
            };
            (*domain, share)
        })
        .collect()
}

fn point(month: YearMonth, overlap_strength: f64, time_overlap_weight: f64) -> OverlapTimelinePoint {
    OverlapTimelinePoint {
        month,
        overlap_strength,
        time_overlap_weight,
        peak_level: PeakLevel::from_strength(overlap_strength),
    }
}

/// Domain-weighted timeline against the process-wide tables and default
/// config. `anchor` overrides the input's anchor month; with neither, the
/// current month is used.
pub fn build_timeline(
    input: &MatrixInput,
    anchor: Option<YearMonth>,
    horizon_months: u32,
) -> Result<Vec<OverlapTimelinePoint>, ValidationFailure> {
    validate_horizon(horizon_months).map_err(|issue| ValidationFailure::new(vec![issue]))?;
    let anchor = match anchor {
        Some(anchor) => anchor,
        None => resolve_anchor(input)
            .map_err(|issue| ValidationFailure::new(vec![issue]))?
            .unwrap_or_else(YearMonth::current),
    };
    validate_span(anchor, horizon_months).map_err(|issue| ValidationFailure::new(vec![issue]))?;

    let tables = TableRegistry::current();
    let config = FusionConfig::default();
    Ok(TimelineBuilder::new(&tables, &config).build(input, anchor, horizon_months).overall)
}
