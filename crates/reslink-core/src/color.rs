//! Marker color model.
//!
//! The editor stores markers in six numbered categories. Resolve scripts
//! pass color names, many of which have no direct equivalent, so names are
//! folded onto the nearest category through a fixed alias table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ReslinkError, Result};

/// Canonical marker category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum MarkerColor {
    Purple = 0,
    Blue = 1,
    Green = 2,
    Yellow = 3,
    Orange = 4,
    Red = 5,
}

/// Accepted color names and the category each one folds onto.
pub const COLOR_ALIASES: &[(&str, MarkerColor)] = &[
    ("Purple", MarkerColor::Purple),
    ("Blue", MarkerColor::Blue),
    ("Green", MarkerColor::Green),
    ("Yellow", MarkerColor::Yellow),
    ("Orange", MarkerColor::Orange),
    ("Red", MarkerColor::Red),
    ("Fuchsia", MarkerColor::Purple),
    ("Lavender", MarkerColor::Purple),
    ("Cyan", MarkerColor::Blue),
    ("Sky", MarkerColor::Blue),
    ("Mint", MarkerColor::Green),
    ("Lemon", MarkerColor::Yellow),
    ("Cream", MarkerColor::Yellow),
    ("Sand", MarkerColor::Orange),
    ("Cocoa", MarkerColor::Orange),
    ("Rose", MarkerColor::Red),
];

impl MarkerColor {
    /// All categories in numeric order.
    pub const ALL: [Self; 6] = [
        Self::Purple,
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Orange,
        Self::Red,
    ];

    /// Integer category used on the wire.
    #[inline]
    pub fn category(self) -> i64 {
        self as i64
    }

    /// Look up a category by number.
    pub fn from_category(category: i64) -> Result<Self> {
        usize::try_from(category)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| ReslinkError::InvalidColor(format!("unknown category {category}")))
    }

    /// Resolve a color name through the alias table (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        COLOR_ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
            .map(|(_, color)| *color)
            .ok_or_else(|| ReslinkError::InvalidColor(format!("unknown color name {name:?}")))
    }

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Purple => "Purple",
            Self::Blue => "Blue",
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Orange => "Orange",
            Self::Red => "Red",
        }
    }
}

impl fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MarkerColor {
    type Err = ReslinkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

/// A color as supplied by a caller: either a name or a raw category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorArg {
    Name(String),
    Category(i64),
}

impl ColorArg {
    /// Resolve to a canonical category.
    pub fn resolve(&self) -> Result<MarkerColor> {
        match self {
            Self::Name(name) => MarkerColor::from_name(name),
            Self::Category(category) => MarkerColor::from_category(*category),
        }
    }
}

impl From<&str> for ColorArg {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ColorArg {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<i64> for ColorArg {
    fn from(category: i64) -> Self {
        Self::Category(category)
    }
}

impl From<i32> for ColorArg {
    fn from(category: i32) -> Self {
        Self::Category(category as i64)
    }
}

impl From<MarkerColor> for ColorArg {
    fn from(color: MarkerColor) -> Self {
        Self::Category(color.category())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_closure() {
        for (alias, expected) in COLOR_ALIASES {
            let color = MarkerColor::from_name(alias).unwrap();
            assert_eq!(color, *expected);
            let back = MarkerColor::from_category(color.category()).unwrap();
            assert_eq!(back, color);
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(MarkerColor::from_name("cyan").unwrap(), MarkerColor::Blue);
        assert_eq!("ROSE".parse::<MarkerColor>().unwrap(), MarkerColor::Red);
    }

    #[test]
    fn test_unknown_colors_fail() {
        assert!(matches!(
            MarkerColor::from_name("Chartreuse"),
            Err(ReslinkError::InvalidColor(_))
        ));
        assert!(ColorArg::from(6).resolve().is_err());
        assert!(ColorArg::from(-1).resolve().is_err());
    }
}
