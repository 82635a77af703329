//! Engine input, assembled by the caller from the two upstream providers

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::types::Element;

/// Relation detected between pillars (clash, combine, punishment, ...)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationHit {
    /// Table key, e.g. "clash", "combine", "triple_combine"
    pub kind: String,
    /// Free-form provider detail, never used as a key
    #[serde(default)]
    pub detail: String,
}

impl RelationHit {
    pub fn new(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { kind: kind.into(), detail: detail.into() }
    }
}

/// Aspect between two planets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectHit {
    pub planet_a: String,
    pub planet_b: String,
    /// Table key, e.g. "trine", "square"
    pub aspect_type: String,
    /// Exact angle in degrees, 0..=360
    #[serde(default)]
    pub angle: Option<f64>,
    /// Distance from exact in degrees
    #[serde(default)]
    pub orb: Option<f64>,
}

impl AspectHit {
    pub fn new(planet_a: impl Into<String>, planet_b: impl Into<String>, aspect_type: impl Into<String>) -> Self {
        Self {
            planet_a: planet_a.into(),
            planet_b: planet_b.into(),
            aspect_type: aspect_type.into(),
            angle: None,
            orb: None,
        }
    }

    pub fn with_orb(mut self, orb: f64) -> Self {
        self.orb = Some(orb);
        self
    }

    /// Planet pair in canonical (lexicographic, lowercase) order so that
    /// "mars-venus" and "venus-mars" are the same aspect
    pub fn normalized_pair(&self) -> (String, String) {
        let a = self.planet_a.trim().to_ascii_lowercase();
        let b = self.planet_b.trim().to_ascii_lowercase();
        if a <= b { (a, b) } else { (b, a) }
    }

    pub fn involves(&self, planet: &str) -> bool {
        let (a, b) = self.normalized_pair();
        a == planet || b == planet
    }
}

/// Combined Four Pillars + Western chart facts.
///
/// Every collection is ordered so that iteration, serialization and the
/// input digest do not depend on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixInput {
    /// Required
    #[serde(default)]
    pub day_master_element: Option<Element>,
    /// Required: year, month, day, hour
    #[serde(default)]
    pub pillar_elements: Vec<Element>,
    #[serde(default)]
    pub ten_gods: BTreeMap<String, u32>,
    #[serde(default)]
    pub twelve_stages: BTreeMap<String, u32>,
    #[serde(default)]
    pub relations: Vec<RelationHit>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub yongsin: Option<Element>,
    #[serde(default)]
    pub decade_cycle_element: Option<Element>,
    #[serde(default)]
    pub year_cycle_element: Option<Element>,
    /// planet → house 1..=12
    #[serde(default)]
    pub planet_houses: BTreeMap<String, u8>,
    /// planet → zodiac sign name
    #[serde(default)]
    pub planet_signs: BTreeMap<String, String>,
    #[serde(default)]
    pub aspects: Vec<AspectHit>,
    #[serde(default)]
    pub active_transits: BTreeSet<String>,
    /// "YYYY-MM"; the current month is used when absent
    #[serde(default)]
    pub anchor_month: Option<String>,
}

impl MatrixInput {
    /// Minimal input with the required Four Pillars fields
    pub fn new(day_master: Element, pillars: [Element; 4]) -> Self {
        Self {
            day_master_element: Some(day_master),
            pillar_elements: pillars.to_vec(),
            ..Self::default()
        }
    }

    /// Planets known to the chart, lowercase, ordered
    pub fn planets(&self) -> BTreeSet<String> {
        self.planet_houses
            .keys()
            .chain(self.planet_signs.keys())
            .map(|p| p.trim().to_ascii_lowercase())
            .collect()
    }

    /// Sign of a planet, case-insensitive
    pub fn sign_of(&self, planet: &str) -> Option<&str> {
        self.planet_signs
            .iter()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(planet))
            .map(|(_, sign)| sign.as_str())
    }

    /// Relation kinds with multiplicity, lowercase
    pub fn relation_kinds(&self) -> BTreeMap<String, u32> {
        let mut kinds = BTreeMap::new();
        for hit in &self.relations {
            *kinds.entry(hit.kind.trim().to_ascii_lowercase()).or_insert(0) += 1;
        }
        kinds
    }

    /// Aspects deduplicated by (pair, type), keeping the tightest orb
    pub fn unique_aspects(&self) -> Vec<AspectHit> {
        let mut by_key: BTreeMap<(String, String, String), AspectHit> = BTreeMap::new();
        for aspect in &self.aspects {
            let (a, b) = aspect.normalized_pair();
            let kind = aspect.aspect_type.trim().to_ascii_lowercase();
            let normalized = AspectHit {
                planet_a: a.clone(),
                planet_b: b.clone(),
                aspect_type: kind.clone(),
                angle: aspect.angle,
                orb: aspect.orb,
            };
            by_key
                .entry((a, b, kind))
                .and_modify(|kept| {
                    let kept_orb = kept.orb.unwrap_or(f64::INFINITY);
                    let new_orb = normalized.orb.unwrap_or(f64::INFINITY);
                    if new_orb < kept_orb {
                        *kept = normalized.clone();
                    }
                })
                .or_insert(normalized);
        }
        by_key.into_values().collect()
    }

    /// Active transit names, lowercase and trimmed
    pub fn transit_names(&self) -> BTreeSet<String> {
        self.active_transits
            .iter()
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}
