//! Interaction codes: the cells of the matrix tables

use serde::{Deserialize, Serialize};
use crate::{CODE_SCORE_MAX, CODE_SCORE_MIN};

/// Qualitative strength of an interaction, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionLevel {
    /// Systems reinforce each other at full force (9-10)
    Extreme,
    /// Clear mutual support (7-8)
    Amplify,
    /// Neutral coexistence (5-6)
    Balance,
    /// Friction (3-4)
    Clash,
    /// Direct opposition (1-2)
    Conflict,
}

impl InteractionLevel {
    /// Inclusive score range allowed for this level
    pub fn score_range(&self) -> (u8, u8) {
        match self {
            InteractionLevel::Extreme => (9, CODE_SCORE_MAX),
            InteractionLevel::Amplify => (7, 8),
            InteractionLevel::Balance => (5, 6),
            InteractionLevel::Clash => (3, 4),
            InteractionLevel::Conflict => (CODE_SCORE_MIN, 2),
        }
    }

    /// Level a score belongs to, None outside the 1-10 scale
    pub fn for_score(score: u8) -> Option<Self> {
        [
            InteractionLevel::Extreme,
            InteractionLevel::Amplify,
            InteractionLevel::Balance,
            InteractionLevel::Clash,
            InteractionLevel::Conflict,
        ]
        .into_iter()
        .find(|level| level.accepts(score))
    }

    /// Does `score` fall within this level's range?
    pub fn accepts(&self, score: u8) -> bool {
        let (lo, hi) = self.score_range();
        (lo..=hi).contains(&score)
    }

    /// Color the level is rendered with
    pub fn color(&self) -> ColorCode {
        match self {
            InteractionLevel::Extreme => ColorCode::Purple,
            InteractionLevel::Amplify => ColorCode::Green,
            InteractionLevel::Balance => ColorCode::Blue,
            InteractionLevel::Clash => ColorCode::Yellow,
            InteractionLevel::Conflict => ColorCode::Red,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InteractionLevel::Extreme => "extreme",
            InteractionLevel::Amplify => "amplify",
            InteractionLevel::Balance => "balance",
            InteractionLevel::Clash => "clash",
            InteractionLevel::Conflict => "conflict",
        }
    }
}

impl std::fmt::Display for InteractionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Display color tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorCode {
    Purple,
    Green,
    Blue,
    Yellow,
    Red,
}

impl ColorCode {
    pub fn name(&self) -> &'static str {
        match self {
            ColorCode::Purple => "purple",
            ColorCode::Green => "green",
            ColorCode::Blue => "blue",
            ColorCode::Yellow => "yellow",
            ColorCode::Red => "red",
        }
    }
}

impl std::fmt::Display for ColorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Keyword in both supported locales.
///
/// Fields default to empty so a table with a missing locale still parses and
/// is rejected by validation with a precise location instead of a serde error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    #[serde(default)]
    pub ko: String,
    #[serde(default)]
    pub en: String,
}

impl Keyword {
    pub fn new(ko: impl Into<String>, en: impl Into<String>) -> Self {
        Self { ko: ko.into(), en: en.into() }
    }

    /// Locale that is blank, if any
    pub fn missing_locale(&self) -> Option<&'static str> {
        if self.ko.trim().is_empty() {
            Some("ko")
        } else if self.en.trim().is_empty() {
            Some("en")
        } else {
            None
        }
    }
}

/// One matrix cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionCode {
    pub level: InteractionLevel,
    /// 1-10, consistent with `level`
    pub score: u8,
    pub icon: String,
    pub color: ColorCode,
    pub keyword: Keyword,
}

impl InteractionCode {
    /// Build a code whose level and color are derived from the score
    pub fn from_score(score: u8, icon: impl Into<String>, keyword: Keyword) -> Option<Self> {
        let level = InteractionLevel::for_score(score)?;
        Some(Self {
            level,
            score,
            icon: icon.into(),
            color: level.color(),
            keyword,
        })
    }

    /// Positive contributions become drivers
    pub fn is_driver(&self) -> bool {
        self.score >= crate::DRIVER_MIN_SCORE
    }

    /// Friction or opposition becomes a caution
    pub fn is_caution(&self) -> bool {
        self.score <= crate::CAUTION_MAX_SCORE
    }
}

/// Semantic layer of the interaction tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// five-phase element × western element
    ElementCore,
    /// ten-god category × planet
    TenGodPlanet,
    /// ten-god category × house
    TenGodHouse,
    /// twelve-stage category × house
    TwelveStageHouse,
    /// relation kind × aspect type
    RelationAspect,
    /// pattern type × planet
    PatternPlanet,
    /// five-phase element × transit/cycle event
    ElementTransit,
    /// transit/cycle event × domain
    TransitDomain,
}

impl Layer {
    pub const ALL: [Layer; 8] = [
        Layer::ElementCore,
        Layer::TenGodPlanet,
        Layer::TenGodHouse,
        Layer::TwelveStageHouse,
        Layer::RelationAspect,
        Layer::PatternPlanet,
        Layer::ElementTransit,
        Layer::TransitDomain,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Layer::ElementCore => "element_core",
            Layer::TenGodPlanet => "ten_god_planet",
            Layer::TenGodHouse => "ten_god_house",
            Layer::TwelveStageHouse => "twelve_stage_house",
            Layer::RelationAspect => "relation_aspect",
            Layer::PatternPlanet => "pattern_planet",
            Layer::ElementTransit => "element_transit",
            Layer::TransitDomain => "transit_domain",
        }
    }

    /// Layers that score the natal profile (the rest are timing layers)
    pub fn is_natal(&self) -> bool {
        !matches!(self, Layer::ElementTransit | Layer::TransitDomain)
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extreme_is_top_of_scale() {
        let (_, hi) = InteractionLevel::Extreme.score_range();
        assert_eq!(hi, CODE_SCORE_MAX);
        assert_eq!(InteractionLevel::for_score(10), Some(InteractionLevel::Extreme));
    }

    #[test]
    fn test_every_score_has_exactly_one_level() {
        for score in CODE_SCORE_MIN..=CODE_SCORE_MAX {
            let level = InteractionLevel::for_score(score).unwrap();
            assert!(level.accepts(score));
        }
        assert_eq!(InteractionLevel::for_score(0), None);
        assert_eq!(InteractionLevel::for_score(11), None);
    }

    #[test]
    fn test_from_score_derives_color() {
        let code = InteractionCode::from_score(3, "⚠️", Keyword::new("마찰", "Friction")).unwrap();
        assert_eq!(code.level, InteractionLevel::Clash);
        assert_eq!(code.color, ColorCode::Yellow);
        assert!(code.is_caution());
        assert!(!code.is_driver());
    }

    #[test]
    fn test_missing_locale_detection() {
        assert_eq!(Keyword::new("", "x").missing_locale(), Some("ko"));
        assert_eq!(Keyword::new("x", " ").missing_locale(), Some("en"));
        assert_eq!(Keyword::new("x", "y").missing_locale(), None);
    }

    #[test]
    fn test_layer_serde_key_matches_table_key() {
        for layer in Layer::ALL {
            let json = serde_json::to_string(&layer).unwrap();
            assert_eq!(json, format!("\"{}\"", layer.key()));
        }
    }
}
