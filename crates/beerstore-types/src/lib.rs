//! Shared entity definitions for beerstore.
//!
//! The catalogue holds a single entity, [`Beer`]. Its type and style are
//! closed enumerations with fixed numeric codes; those codes are what the
//! storage layer persists, so the discriminants below must never be
//! renumbered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Beer type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BeerType {
    Ale = 1,
    Lager = 2,
    Malt = 3,
    Stout = 4,
}

impl BeerType {
    /// All variants, in code order.
    pub const ALL: [BeerType; 4] = [Self::Ale, Self::Lager, Self::Malt, Self::Stout];

    /// Returns the numeric code stored for this type.
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    /// Attempts to convert a stored code to a `BeerType`.
    ///
    /// Returns `None` if the code does not correspond to a known type.
    pub fn from_i64(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Ale),
            2 => Some(Self::Lager),
            3 => Some(Self::Malt),
            4 => Some(Self::Stout),
            _ => None,
        }
    }

    /// Returns the human-readable label for this type.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ale => "Ale",
            Self::Lager => "Lager",
            Self::Malt => "Malt",
            Self::Stout => "Stout",
        }
    }
}

impl fmt::Display for BeerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Beer style codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BeerStyle {
    Amber = 1,
    Blonde = 2,
    Brown = 3,
    Cream = 4,
    Dark = 5,
    Pale = 6,
    Strong = 7,
    Wheat = 8,
    Red = 9,
}

impl BeerStyle {
    /// All variants, in code order.
    pub const ALL: [BeerStyle; 9] = [
        Self::Amber,
        Self::Blonde,
        Self::Brown,
        Self::Cream,
        Self::Dark,
        Self::Pale,
        Self::Strong,
        Self::Wheat,
        Self::Red,
    ];

    /// Returns the numeric code stored for this style.
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    /// Attempts to convert a stored code to a `BeerStyle`.
    ///
    /// Returns `None` if the code does not correspond to a known style.
    pub fn from_i64(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Amber),
            2 => Some(Self::Blonde),
            3 => Some(Self::Brown),
            4 => Some(Self::Cream),
            5 => Some(Self::Dark),
            6 => Some(Self::Pale),
            7 => Some(Self::Strong),
            8 => Some(Self::Wheat),
            9 => Some(Self::Red),
            _ => None,
        }
    }

    /// Returns the human-readable label for this style.
    pub fn label(self) -> &'static str {
        match self {
            Self::Amber => "Amber",
            Self::Blonde => "Blonde",
            Self::Brown => "Brown",
            Self::Cream => "Cream",
            Self::Dark => "Dark",
            Self::Pale => "Pale",
            Self::Strong => "Strong",
            Self::Wheat => "Wheat",
            Self::Red => "Red",
        }
    }
}

impl fmt::Display for BeerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A beer in the catalogue.
///
/// `id` is chosen by the caller, not generated by storage. Storing two
/// beers with the same `id` is rejected by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beer {
    /// Caller-supplied unique identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Type of the beer.
    #[serde(rename = "type")]
    pub beer_type: BeerType,
    /// Style of the beer.
    pub style: BeerStyle,
}
