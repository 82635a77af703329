//! Domain scores
//!
//! Each domain owns a category set (ten gods, houses, planets). The input is
//! expanded into table lookups restricted to that set; every lookup that
//! resolves becomes a match carrying two weights, one for how prominent its
//! Four Pillars side is and one for its chart side. The base score weighs by
//! both, the component scores by one side each.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::config::{bounded_or, FusionConfig};
use crate::core::alignment::{alignment, alignment_term};
use crate::core::overlap::TimeOverlap;
use crate::core::tables::TableSet;
use crate::types::{
    house_key, house_weight, planet_weight, sign_element, Domain, DomainScore, Element, Evidence,
    InteractionCode, Layer, MatrixInput, WesternElement,
};
use crate::{CODE_SCORE_MAX, CONFIDENCE_MIN, DOMAIN_SCORE_MAX, DOMAIN_SCORE_MIN, NEUTRAL_BASE_SCORE};

// =============================================================================
// DOMAIN CATEGORY SETS [C]
// =============================================================================

struct DomainProfile {
    ten_gods: &'static [&'static str],
    houses: &'static [u8],
    planets: &'static [&'static str],
}

const CAREER: DomainProfile = DomainProfile {
    ten_gods: &["direct_officer", "seven_killings", "eating_god", "hurting_officer", "companion"],
    houses: &[10, 6, 1],
    planets: &["sun", "saturn", "mars", "jupiter", "mercury"],
};

const LOVE: DomainProfile = DomainProfile {
    ten_gods: &["direct_wealth", "indirect_wealth", "direct_officer", "seven_killings", "eating_god"],
    houses: &[5, 7, 8],
    planets: &["venus", "moon", "mars", "neptune"],
};

const MONEY: DomainProfile = DomainProfile {
    ten_gods: &["direct_wealth", "indirect_wealth", "eating_god", "rob_wealth"],
    houses: &[2, 8, 11],
    planets: &["venus", "jupiter", "saturn", "pluto"],
};

const HEALTH: DomainProfile = DomainProfile {
    ten_gods: &["companion", "rob_wealth", "direct_resource", "indirect_resource", "seven_killings"],
    houses: &[1, 6, 12],
    planets: &["sun", "moon", "mars", "saturn", "neptune"],
};

const RELOCATION: DomainProfile = DomainProfile {
    ten_gods: &["indirect_wealth", "indirect_resource", "hurting_officer", "seven_killings"],
    houses: &[4, 9, 3],
    planets: &["jupiter", "uranus", "moon", "mercury"],
};

fn profile(domain: Domain) -> &'static DomainProfile {
    match domain {
        Domain::Career => &CAREER,
        Domain::Love => &LOVE,
        Domain::Money => &MONEY,
        Domain::Health => &HEALTH,
        Domain::Relocation => &RELOCATION,
    }
}

// Four Pillars side weights
const SAJU_WEIGHT_DAY_MASTER: f64 = 2.0;
const SAJU_WEIGHT_PILLAR: f64 = 1.0;
const SAJU_WEIGHT_YONGSIN: f64 = 1.5;
const SAJU_WEIGHT_PATTERN: f64 = 1.5;
const SAJU_COUNT_CAP: u32 = 3;

/// Orb at which an aspect stops adding weight
const ORB_WEIGHT_SPAN: f64 = 10.0;

/// Category keys are matched as lowercase snake_case
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Tighter orbs weigh more: 1.0 + (1 - orb / span), unknown orb = 1.0
fn orb_weight(orb: Option<f64>) -> f64 {
    match orb {
        Some(orb) if orb.is_finite() => 1.0 + (1.0 - orb.abs() / ORB_WEIGHT_SPAN).clamp(0.0, 1.0),
        _ => 1.0,
    }
}

/// A lookup that resolved to a table entry
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixMatch<'t> {
    pub layer: Layer,
    pub key_a: String,
    pub key_b: String,
    pub code: &'t InteractionCode,
    pub saju_weight: f64,
    pub astro_weight: f64,
}

impl MatrixMatch<'_> {
    pub fn total_weight(&self) -> f64 {
        self.saju_weight + self.astro_weight
    }

    fn evidence(&self) -> Evidence {
        Evidence {
            label: self.code.keyword.en.clone(),
            layer: self.layer,
            key_a: self.key_a.clone(),
            key_b: self.key_b.clone(),
            level: self.code.level,
            score: self.code.score,
        }
    }
}

/// Scores domains against a table set
#[derive(Debug, Clone, Copy)]
pub struct DomainScorer<'a> {
    tables: &'a TableSet,
    config: &'a FusionConfig,
}

impl<'a> DomainScorer<'a> {
    pub fn new(tables: &'a TableSet, config: &'a FusionConfig) -> Self {
        Self { tables, config }
    }

    /// Every resolved lookup of `domain`, ordered by (layer, key_a, key_b)
    pub fn collect_matches(&self, input: &MatrixInput, domain: Domain) -> Vec<MatrixMatch<'a>> {
        let profile = profile(domain);
        let chart_planets = input.planets();
        let planets: Vec<&str> = profile
            .planets
            .iter()
            .copied()
            .filter(|p| chart_planets.contains(*p))
            .collect();
        let houses = occupied_houses(input, profile.houses);
        let ten_gods: Vec<(String, f64)> = input
            .ten_gods
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(name, count)| (normalize_key(name), (*count).min(SAJU_COUNT_CAP) as f64))
            .filter(|(name, _)| profile.ten_gods.contains(&name.as_str()))
            .collect();

        let mut matches = Vec::new();

        // element × western element
        let saju_elements = saju_element_weights(input);
        let western = western_element_weights(input, &planets);
        for (element, saju_w) in &saju_elements {
            for (west, astro_w) in &western {
                self.push(&mut matches, Layer::ElementCore, element.key(), west.key(), *saju_w, *astro_w);
            }
        }

        // ten god × planet, ten god × house
        for (ten_god, saju_w) in &ten_gods {
            for planet in &planets {
                self.push(&mut matches, Layer::TenGodPlanet, ten_god, planet, *saju_w, planet_weight(planet));
            }
            for (house, astro_w) in &houses {
                self.push(&mut matches, Layer::TenGodHouse, ten_god, &house_key(*house), *saju_w, *astro_w);
            }
        }

        // twelve stage × house
        for (stage, count) in input.twelve_stages.iter().filter(|(_, c)| **c > 0) {
            let stage = normalize_key(stage);
            let saju_w = (*count).min(SAJU_COUNT_CAP) as f64;
            for (house, astro_w) in &houses {
                self.push(&mut matches, Layer::TwelveStageHouse, &stage, &house_key(*house), saju_w, *astro_w);
            }
        }

        // relation × aspect
        let aspect_types = aspect_type_weights(input, &planets);
        for (kind, multiplicity) in input.relation_kinds() {
            let kind = normalize_key(&kind);
            let saju_w = multiplicity.min(SAJU_COUNT_CAP) as f64;
            for (aspect_type, astro_w) in &aspect_types {
                self.push(&mut matches, Layer::RelationAspect, &kind, aspect_type, saju_w, *astro_w);
            }
        }

        // pattern × planet
        if let Some(pattern) = input.pattern.as_deref().map(normalize_key) {
            for planet in &planets {
                self.push(&mut matches, Layer::PatternPlanet, &pattern, planet, SAJU_WEIGHT_PATTERN, planet_weight(planet));
            }
        }

        matches.sort_by(|a, b| {
            (a.layer, &a.key_a, &a.key_b).cmp(&(b.layer, &b.key_a, &b.key_b))
        });
        matches.dedup_by(|a, b| a.layer == b.layer && a.key_a == b.key_a && a.key_b == b.key_b);
        matches
    }

    fn push(
        &self,
        matches: &mut Vec<MatrixMatch<'a>>,
        layer: Layer,
        key_a: &str,
        key_b: &str,
        saju_weight: f64,
        astro_weight: f64,
    ) {
        if let Some(code) = self.tables.lookup(layer, key_a, key_b) {
            matches.push(MatrixMatch {
                layer,
                key_a: key_a.to_string(),
                key_b: key_b.to_string(),
                code,
                saju_weight,
                astro_weight,
            });
        }
    }

    /// Fuse the domain's matches with its time overlap
    pub fn score(&self, input: &MatrixInput, domain: Domain, overlap: TimeOverlap) -> DomainScore {
        let matches = self.collect_matches(input, domain);

        let base = weighted_score(&matches, |m| m.total_weight()).unwrap_or(NEUTRAL_BASE_SCORE);
        let saju = weighted_score(&matches, |m| m.saju_weight).unwrap_or(NEUTRAL_BASE_SCORE);
        let astro = weighted_score(&matches, |m| m.astro_weight).unwrap_or(NEUTRAL_BASE_SCORE);

        let alignment_score = alignment(saju, astro, self.config.alignment_exponent);
        let term = alignment_term(alignment_score, self.config.alignment_term_floor);
        let final_score = (base * term * overlap.time_overlap_weight).clamp(DOMAIN_SCORE_MIN, DOMAIN_SCORE_MAX);

        let coverage = matches.len() as f64 / self.config.confidence_target_matches.max(1) as f64;
        let min = bounded_or(self.config.confidence_min, 0.0, 1.0, CONFIDENCE_MIN);
        let confidence = min + (1.0 - min) * coverage.min(1.0);

        let (drivers, driver_evidence) = pick_labels(
            matches.iter().filter(|m| m.code.is_driver()).collect(),
            |a, b| b.code.score.cmp(&a.code.score),
            self.config.drivers_per_domain,
        );
        let (cautions, caution_evidence) = pick_labels(
            matches.iter().filter(|m| m.code.is_caution()).collect(),
            |a, b| a.code.score.cmp(&b.code.score),
            self.config.cautions_per_domain,
        );

        debug!(
            domain = %domain,
            matches = matches.len(),
            base,
            saju,
            astro,
            alignment = alignment_score,
            weight = overlap.time_overlap_weight,
            final_score,
            "domain scored"
        );

        DomainScore {
            domain,
            base_final_score: base,
            final_score_adjusted: final_score,
            saju_component_score: saju,
            astro_component_score: astro,
            alignment_score,
            alignment_term: term,
            overlap_strength: overlap.overlap_strength,
            time_overlap_weight: overlap.time_overlap_weight,
            confidence_score: confidence,
            matched_count: matches.len(),
            drivers,
            cautions,
            evidence: driver_evidence.into_iter().chain(caution_evidence).collect(),
        }
    }
}

/// Σ score·w / Σ w on 0..=100, None without matches
fn weighted_score(matches: &[MatrixMatch<'_>], weight: impl Fn(&MatrixMatch<'_>) -> f64) -> Option<f64> {
    let (sum, total) = matches.iter().fold((0.0, 0.0), |(sum, total), m| {
        let w = weight(m);
        (sum + m.code.score as f64 * w, total + w)
    });
    if total > 0.0 {
        Some(sum / total * (DOMAIN_SCORE_MAX / CODE_SCORE_MAX as f64))
    } else {
        None
    }
}

/// Rank candidates (primary order, then heavier first, then table key) and
/// keep the first `limit` distinct labels
fn pick_labels(
    mut candidates: Vec<&MatrixMatch<'_>>,
    primary: impl Fn(&MatrixMatch<'_>, &MatrixMatch<'_>) -> std::cmp::Ordering,
    limit: usize,
) -> (Vec<String>, Vec<Evidence>) {
    candidates.sort_by(|a, b| {
        primary(*a, *b)
            .then_with(|| b.total_weight().total_cmp(&a.total_weight()))
            .then_with(|| (a.layer, &a.key_a, &a.key_b).cmp(&(b.layer, &b.key_a, &b.key_b)))
    });

    let mut labels: Vec<String> = Vec::new();
    let mut evidence = Vec::new();
    for candidate in candidates {
        if labels.len() >= limit {
            break;
        }
        let label = &candidate.code.keyword.en;
        if !labels.contains(label) {
            labels.push(label.clone());
            evidence.push(candidate.evidence());
        }
    }
    (labels, evidence)
}

/// Saju elements with their prominence
fn saju_element_weights(input: &MatrixInput) -> BTreeMap<Element, f64> {
    let mut weights = BTreeMap::new();
    if let Some(day_master) = input.day_master_element {
        *weights.entry(day_master).or_insert(0.0) += SAJU_WEIGHT_DAY_MASTER;
    }
    for pillar in &input.pillar_elements {
        *weights.entry(*pillar).or_insert(0.0) += SAJU_WEIGHT_PILLAR;
    }
    if let Some(yongsin) = input.yongsin {
        *weights.entry(yongsin).or_insert(0.0) += SAJU_WEIGHT_YONGSIN;
    }
    weights
}

/// Western elements of the domain planets' signs, weighted by planet
fn western_element_weights(input: &MatrixInput, planets: &[&str]) -> BTreeMap<WesternElement, f64> {
    let mut weights = BTreeMap::new();
    for planet in planets {
        if let Some(element) = input.sign_of(planet).and_then(sign_element) {
            *weights.entry(element).or_insert(0.0) += planet_weight(planet);
        }
    }
    weights
}

/// Domain houses holding at least one planet, weighted by occupants
fn occupied_houses(input: &MatrixInput, houses: &[u8]) -> Vec<(u8, f64)> {
    let mut occupancy: BTreeMap<u8, f64> = BTreeMap::new();
    for (planet, house) in &input.planet_houses {
        if houses.contains(house) {
            *occupancy.entry(*house).or_insert(0.0) += planet_weight(planet);
        }
    }
    occupancy
        .into_iter()
        .map(|(house, weight)| (house, weight * house_weight(house)))
        .collect()
}

/// Aspect types touching a domain planet, each at its tightest orb
fn aspect_type_weights(input: &MatrixInput, planets: &[&str]) -> BTreeMap<String, f64> {
    let planets: BTreeSet<&str> = planets.iter().copied().collect();
    let mut weights: BTreeMap<String, f64> = BTreeMap::new();
    for aspect in input.unique_aspects() {
        if planets.iter().any(|p| aspect.involves(p)) {
            let weight = orb_weight(aspect.orb);
            let entry = weights.entry(aspect.aspect_type.clone()).or_insert(0.0);
            *entry = entry.max(weight);
        }
    }
    weights
}
