//! Taste feedback enumerations
//!
//! Closed variant sets so the adjustment mapping in `brew` is exhaustively
//! checked. String forms are the SCREAMING names stored in the database.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primary taste verdict for a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TastePrimary {
    Sour,
    Perfect,
    Bitter,
}

impl TastePrimary {
    pub fn as_str(&self) -> &'static str {
        match self {
            TastePrimary::Sour => "SOUR",
            TastePrimary::Perfect => "PERFECT",
            TastePrimary::Bitter => "BITTER",
        }
    }
}

impl fmt::Display for TastePrimary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TastePrimary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SOUR" => Ok(TastePrimary::Sour),
            "PERFECT" => Ok(TastePrimary::Perfect),
            "BITTER" => Ok(TastePrimary::Bitter),
            other => Err(format!("unknown primary taste: {}", other)),
        }
    }
}

/// Secondary strength verdict, independent of the primary taste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TasteSecondary {
    Weak,
    Strong,
}

impl TasteSecondary {
    pub fn as_str(&self) -> &'static str {
        match self {
            TasteSecondary::Weak => "WEAK",
            TasteSecondary::Strong => "STRONG",
        }
    }
}

impl fmt::Display for TasteSecondary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TasteSecondary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WEAK" => Ok(TasteSecondary::Weak),
            "STRONG" => Ok(TasteSecondary::Strong),
            other => Err(format!("unknown secondary taste: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_forms_round_trip() {
        for taste in [TastePrimary::Sour, TastePrimary::Perfect, TastePrimary::Bitter] {
            assert_eq!(taste.as_str().parse::<TastePrimary>().unwrap(), taste);
        }
        for taste in [TasteSecondary::Weak, TasteSecondary::Strong] {
            assert_eq!(taste.as_str().parse::<TasteSecondary>().unwrap(), taste);
        }
    }

    #[test]
    fn unknown_values_are_rejected() {
        assert!("SALTY".parse::<TastePrimary>().is_err());
        assert!("sour".parse::<TastePrimary>().is_err());
    }
}
