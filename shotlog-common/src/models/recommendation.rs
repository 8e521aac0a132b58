//! Grind recommendation types
//!
//! Two shapes: `ShotRecommendation` rows tied one-to-one to shots for
//! coaching-effectiveness analytics, and the per-bean `GrindRecommendation`
//! cache payload holding the latest suggestion.

use super::{TastePrimary, TasteSecondary};
use crate::brew::ExtractionWindow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Suggested direction on the grinder scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrindAdjustment {
    Finer,
    Coarser,
    Hold,
}

impl GrindAdjustment {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrindAdjustment::Finer => "FINER",
            GrindAdjustment::Coarser => "COARSER",
            GrindAdjustment::Hold => "HOLD",
        }
    }
}

impl fmt::Display for GrindAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrindAdjustment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FINER" => Ok(GrindAdjustment::Finer),
            "COARSER" => Ok(GrindAdjustment::Coarser),
            "HOLD" => Ok(GrindAdjustment::Hold),
            other => Err(format!("unknown grind adjustment: {}", other)),
        }
    }
}

/// How much to trust a recommendation: high when backed by explicit taste
/// feedback, low when derived from timing alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    Low,
    High,
}

impl Default for Confidence {
    fn default() -> Self {
        Confidence::Low
    }
}

/// What was suggested after a particular shot, and whether the next shot
/// for that bean actually followed it. One row per shot; never required
/// for shot validity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotRecommendation {
    pub shot_id: Uuid,
    pub bean_id: Uuid,
    pub adjustment: GrindAdjustment,
    pub suggested_setting: Option<String>,
    pub reason: String,
    pub taste_based: bool,
    /// None until the next shot for the bean is recorded and compared.
    pub followed: Option<bool>,
    pub created_at: DateTime<Utc>,
}

/// Latest computed recommendation for a bean, cached one-per-bean and
/// overwritten wholesale on every new computation.
///
/// The serialized form must stay forward compatible: unknown fields are
/// ignored on read and fields added later default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrindRecommendation {
    pub bean_id: Uuid,
    pub suggested_setting: Option<String>,
    pub adjustment: GrindAdjustment,
    pub reason: String,
    #[serde(default)]
    pub recommended_dose_g: Option<f64>,
    pub target_window: ExtractionWindow,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub followed: bool,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub taste_based: bool,
    /// Shot the recommendation was computed from, when one existed.
    #[serde(default)]
    pub source_shot_id: Option<Uuid>,
    #[serde(default)]
    pub taste_primary: Option<TastePrimary>,
    #[serde(default)]
    pub taste_secondary: Option<TasteSecondary>,
}
