//! Time overlap weight: how much concurrent timing reinforces a domain
//!
//! Saju side: the active elemental cells (day master, decade cycle, year
//! cycle). Astro side: the active transit/cycle events. An event contributes
//! when it resolves in both `element_transit` (against any saju cell) and
//! `transit_domain` (against the domain):
//!
//!   contribution = (best cell score / 10) × (domain score / 10) × intensity
//!   weight       = clamp(1.0 + increment × Σ contribution, 1.0, ceiling)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{bounded_or, FusionConfig};
use crate::core::tables::TableSet;
use crate::types::{Domain, Element, Layer, MatrixInput};
use crate::{CODE_SCORE_MAX, OVERLAP_WEIGHT_CEILING, OVERLAP_WEIGHT_FLOOR};

/// How long each known event keeps influencing the timeline, in months
const EVENT_WINDOWS: &[(&str, u32)] = &[
    ("jupiter-return", 12),
    ("saturn-return", 24),
    ("node-return", 18),
    ("eclipse", 6),
    ("mercury-retrograde", 1),
    ("venus-retrograde", 2),
    ("mars-retrograde", 3),
    ("solar-return", 1),
    ("uranus-opposition", 24),
    ("pluto-square", 36),
];

/// Window for events not listed above
pub const DEFAULT_EVENT_WINDOW_MONTHS: u32 = 3;

/// Activity window of an event name
pub fn event_window_months(name: &str) -> u32 {
    EVENT_WINDOWS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, months)| *months)
        .unwrap_or(DEFAULT_EVENT_WINDOW_MONTHS)
}

/// Transit/cycle event with its intensity at the month being scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEvent {
    pub name: String,
    /// 0..=1, 1.0 in the anchor month
    pub intensity: f64,
}

impl ActiveEvent {
    pub fn new(name: impl Into<String>, intensity: f64) -> Self {
        Self { name: name.into(), intensity }
    }

    /// Linear decay across the event's window; zero once it has elapsed
    pub fn decayed(name: &str, month_offset: u32) -> Self {
        let window = event_window_months(name);
        let intensity = if month_offset >= window {
            0.0
        } else {
            1.0 - month_offset as f64 / window as f64
        };
        Self::new(name, intensity)
    }
}

/// Active cells of both systems for one month
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveCells {
    pub saju: Vec<Element>,
    pub astro: Vec<ActiveEvent>,
}

impl ActiveCells {
    /// Cells in the anchor month
    pub fn from_input(input: &MatrixInput) -> Self {
        Self::at_month_offset(input, 0, true)
    }

    /// Cells `offset` months after the anchor. The year-cycle element is only
    /// known for the anchor's calendar year, so callers pass
    /// `include_year_cycle = false` past it.
    pub fn at_month_offset(input: &MatrixInput, offset: u32, include_year_cycle: bool) -> Self {
        let mut saju = Vec::with_capacity(3);
        let year = if include_year_cycle { input.year_cycle_element } else { None };
        for element in [input.day_master_element, input.decade_cycle_element, year]
            .into_iter()
            .flatten()
        {
            if !saju.contains(&element) {
                saju.push(element);
            }
        }

        let astro = input
            .transit_names()
            .iter()
            .map(|name| ActiveEvent::decayed(name, offset))
            .filter(|event| event.intensity > 0.0)
            .collect();

        Self { saju, astro }
    }
}

/// Timing multiplier of one domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeOverlap {
    /// 1.0..=1.3
    pub time_overlap_weight: f64,
    /// Σ contribution, unbounded above
    pub overlap_strength: f64,
    /// Events with a nonzero contribution
    pub contributing_events: usize,
}

impl TimeOverlap {
    /// No timing reinforcement
    pub fn floor() -> Self {
        Self {
            time_overlap_weight: OVERLAP_WEIGHT_FLOOR,
            overlap_strength: 0.0,
            contributing_events: 0,
        }
    }
}

/// Computes time overlap against a table set
#[derive(Debug, Clone, Copy)]
pub struct TimeOverlapCalculator<'a> {
    tables: &'a TableSet,
    increment: f64,
    ceiling: f64,
}

impl<'a> TimeOverlapCalculator<'a> {
    pub fn new(tables: &'a TableSet, config: &FusionConfig) -> Self {
        Self {
            tables,
            increment: config.overlap_increment_per_event.max(0.0),
            ceiling: bounded_or(
                config.overlap_weight_ceiling,
                OVERLAP_WEIGHT_FLOOR,
                OVERLAP_WEIGHT_CEILING,
                OVERLAP_WEIGHT_CEILING,
            ),
        }
    }

    /// Weight and strength for `domain` given both systems' active cells
    pub fn calculate(&self, saju: &[Element], astro: &[ActiveEvent], domain: Domain) -> TimeOverlap {
        // Same event listed twice counts once, at its highest intensity;
        // ordering by name keeps the float sum independent of caller order.
        let mut events: BTreeMap<&str, f64> = BTreeMap::new();
        for event in astro {
            let entry = events.entry(event.name.as_str()).or_insert(0.0);
            *entry = entry.max(event.intensity);
        }

        let mut result = TimeOverlap::floor();
        for (name, intensity) in events {
            let contribution = self.event_contribution(saju, name, intensity, domain);
            if contribution > 0.0 {
                result.overlap_strength += contribution;
                result.contributing_events += 1;
            }
        }

        result.time_overlap_weight = (OVERLAP_WEIGHT_FLOOR + self.increment * result.overlap_strength)
            .clamp(OVERLAP_WEIGHT_FLOOR, self.ceiling);
        result
    }

    /// Contribution of a single event, 0.0 when either lookup is absent
    pub fn event_contribution(&self, saju: &[Element], event: &str, intensity: f64, domain: Domain) -> f64 {
        let max = CODE_SCORE_MAX as f64;
        let cell = saju
            .iter()
            .filter_map(|element| self.tables.lookup(Layer::ElementTransit, element.key(), event))
            .map(|code| code.score)
            .max();
        let affinity = self.tables.lookup(Layer::TransitDomain, event, domain.key());

        match (cell, affinity) {
            (Some(cell), Some(affinity)) => {
                (cell as f64 / max) * (affinity.score as f64 / max) * intensity.clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> TableSet {
        TableSet::builtin().unwrap()
    }

    #[test]
    fn test_no_events_is_floor() {
        let tables = tables();
        let calc = TimeOverlapCalculator::new(&tables, &FusionConfig::default());
        let overlap = calc.calculate(&[Element::Wood], &[], Domain::Career);
        assert_eq!(overlap.time_overlap_weight, 1.0);
        assert_eq!(overlap.overlap_strength, 0.0);
        assert_eq!(overlap.contributing_events, 0);
    }

    #[test]
    fn test_many_events_clamped() {
        let tables = tables();
        let calc = TimeOverlapCalculator::new(&tables, &FusionConfig::default());
        let events: Vec<ActiveEvent> = EVENT_WINDOWS
            .iter()
            .map(|(name, _)| ActiveEvent::new(*name, 1.0))
            .collect();
        let overlap = calc.calculate(&Element::ALL, &events, Domain::Career);
        assert!(overlap.contributing_events >= 5);
        assert_eq!(overlap.time_overlap_weight, OVERLAP_WEIGHT_CEILING);
    }

    #[test]
    fn test_unknown_event_contributes_nothing() {
        let tables = tables();
        let calc = TimeOverlapCalculator::new(&tables, &FusionConfig::default());
        let overlap = calc.calculate(&[Element::Fire], &[ActiveEvent::new("comet-sighting", 1.0)], Domain::Love);
        assert_eq!(overlap.time_overlap_weight, 1.0);
    }

    #[test]
    fn test_no_saju_cells_contributes_nothing() {
        let tables = tables();
        let calc = TimeOverlapCalculator::new(&tables, &FusionConfig::default());
        let overlap = calc.calculate(&[], &[ActiveEvent::new("eclipse", 1.0)], Domain::Love);
        assert_eq!(overlap.contributing_events, 0);
    }

    #[test]
    fn test_duplicate_events_count_once() {
        let tables = tables();
        let calc = TimeOverlapCalculator::new(&tables, &FusionConfig::default());
        let once = calc.calculate(&[Element::Wood], &[ActiveEvent::new("eclipse", 1.0)], Domain::Career);
        let twice = calc.calculate(
            &[Element::Wood],
            &[ActiveEvent::new("eclipse", 0.5), ActiveEvent::new("eclipse", 1.0)],
            Domain::Career,
        );
        assert_eq!(once, twice);
    }

    #[test]
    fn test_order_independent() {
        let tables = tables();
        let calc = TimeOverlapCalculator::new(&tables, &FusionConfig::default());
        let a = vec![ActiveEvent::new("eclipse", 1.0), ActiveEvent::new("saturn-return", 0.7)];
        let b = vec![ActiveEvent::new("saturn-return", 0.7), ActiveEvent::new("eclipse", 1.0)];
        assert_eq!(
            calc.calculate(&[Element::Earth], &a, Domain::Health),
            calc.calculate(&[Element::Earth], &b, Domain::Health)
        );
    }

    #[test]
    fn test_decay_window() {
        assert_eq!(ActiveEvent::decayed("eclipse", 0).intensity, 1.0);
        assert_eq!(ActiveEvent::decayed("eclipse", 3).intensity, 0.5);
        assert_eq!(ActiveEvent::decayed("eclipse", 6).intensity, 0.0);
        assert_eq!(event_window_months("unknown"), DEFAULT_EVENT_WINDOW_MONTHS);
    }

    #[test]
    fn test_cells_dedupe_and_year_cycle() {
        let mut input = MatrixInput::new(Element::Wood, [Element::Wood; 4]);
        input.decade_cycle_element = Some(Element::Wood);
        input.year_cycle_element = Some(Element::Fire);
        input.active_transits.insert("Eclipse".to_string());

        let now = ActiveCells::from_input(&input);
        assert_eq!(now.saju, vec![Element::Wood, Element::Fire]);
        assert_eq!(now.astro, vec![ActiveEvent::new("eclipse", 1.0)]);

        let later = ActiveCells::at_month_offset(&input, 8, false);
        assert_eq!(later.saju, vec![Element::Wood]);
        assert!(later.astro.is_empty());
    }
}
