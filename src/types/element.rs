//! Elemental vocabulary shared by both systems

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Five-phase element of the Four Pillars profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    /// All elements in generating-cycle order
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    /// Table key
    pub fn key(&self) -> &'static str {
        match self {
            Element::Wood => "wood",
            Element::Fire => "fire",
            Element::Earth => "earth",
            Element::Metal => "metal",
            Element::Water => "water",
        }
    }
}

impl FromStr for Element {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wood" => Ok(Element::Wood),
            "fire" => Ok(Element::Fire),
            "earth" => Ok(Element::Earth),
            "metal" => Ok(Element::Metal),
            "water" => Ok(Element::Water),
            other => Err(format!("unknown element '{}'", other)),
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Classical element of a zodiac sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WesternElement {
    Fire,
    Earth,
    Air,
    Water,
}

impl WesternElement {
    /// Table key
    pub fn key(&self) -> &'static str {
        match self {
            WesternElement::Fire => "fire",
            WesternElement::Earth => "earth",
            WesternElement::Air => "air",
            WesternElement::Water => "water",
        }
    }
}

/// Element of a zodiac sign name, case-insensitive. Unknown names yield None.
pub fn sign_element(sign: &str) -> Option<WesternElement> {
    match sign.trim().to_ascii_lowercase().as_str() {
        "aries" | "leo" | "sagittarius" => Some(WesternElement::Fire),
        "taurus" | "virgo" | "capricorn" => Some(WesternElement::Earth),
        "gemini" | "libra" | "aquarius" => Some(WesternElement::Air),
        "cancer" | "scorpio" | "pisces" => Some(WesternElement::Water),
        _ => None,
    }
}

/// Relative prominence of a planet in the chart
pub fn planet_weight(planet: &str) -> f64 {
    match planet.trim().to_ascii_lowercase().as_str() {
        "sun" | "moon" => 1.5,
        "mercury" | "venus" | "mars" => 1.2,
        "jupiter" | "saturn" => 1.0,
        "uranus" | "neptune" | "pluto" => 0.8,
        _ => 1.0,
    }
}

/// Angular houses (1, 4, 7, 10) carry more weight
pub fn house_weight(house: u8) -> f64 {
    match house {
        1 | 4 | 7 | 10 => 1.25,
        _ => 1.0,
    }
}

/// Table key for a house number
pub fn house_key(house: u8) -> String {
    format!("H{}", house)
}
