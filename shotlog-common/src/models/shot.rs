//! Espresso shot record

use super::{GRINDER_SETTING_MAX_CHARS, NOTES_MAX_CHARS, TastePrimary, TasteSecondary};
use crate::brew::{self, WeightLimits};
use crate::validate::Validity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sane upper bound on extraction time; generous for long lungos.
const EXTRACTION_MAX_SECONDS: f64 = 180.0;

/// A single pulled shot. The brew ratio is always recomputed from the
/// weights, never stored as a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub id: Uuid,
    /// Must reference an existing bean at write time.
    pub bean_id: Uuid,
    pub weight_in_g: f64,
    pub weight_out_g: f64,
    pub extraction_time_seconds: f64,
    pub grinder_setting: String,
    pub notes: String,
    pub taste_primary: Option<TastePrimary>,
    pub taste_secondary: Option<TasteSecondary>,
    pub pulled_at: DateTime<Utc>,
}

impl Shot {
    pub fn new(
        bean_id: Uuid,
        weight_in_g: f64,
        weight_out_g: f64,
        extraction_time_seconds: f64,
        grinder_setting: impl Into<String>,
        pulled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            bean_id,
            weight_in_g,
            weight_out_g,
            extraction_time_seconds,
            grinder_setting: grinder_setting.into(),
            notes: String::new(),
            taste_primary: None,
            taste_secondary: None,
            pulled_at,
        }
    }

    /// Field validation against the caller's weight limits (the active
    /// basket configuration's ranges, or the defaults).
    pub fn validate(&self, limits: &WeightLimits) -> Validity {
        let mut validity = Validity::valid();

        if self.bean_id.is_nil() {
            validity.push("bean id must not be blank");
        }

        if self.weight_in_g < limits.in_min_g || self.weight_in_g > limits.in_max_g {
            validity.push(format!(
                "coffee weight in must be between {}g and {}g",
                limits.in_min_g, limits.in_max_g
            ));
        }
        if self.weight_out_g < limits.out_min_g || self.weight_out_g > limits.out_max_g {
            validity.push(format!(
                "coffee weight out must be between {}g and {}g",
                limits.out_min_g, limits.out_max_g
            ));
        }

        if self.extraction_time_seconds < 0.0 {
            validity.push("extraction time must not be negative");
        }
        if self.extraction_time_seconds > EXTRACTION_MAX_SECONDS {
            validity.push(format!(
                "extraction time must be at most {} seconds",
                EXTRACTION_MAX_SECONDS
            ));
        }

        if self.grinder_setting.trim().is_empty() {
            validity.push("grinder setting must not be blank");
        }
        if self.grinder_setting.chars().count() > GRINDER_SETTING_MAX_CHARS {
            validity.push(format!(
                "grinder setting must be at most {} characters",
                GRINDER_SETTING_MAX_CHARS
            ));
        }

        if self.notes.chars().count() > NOTES_MAX_CHARS {
            validity.push(format!("notes must be at most {} characters", NOTES_MAX_CHARS));
        }

        validity
    }

    /// `weight_out / weight_in`, undefined for non-positive input weight.
    pub fn brew_ratio(&self) -> Option<f64> {
        brew::brew_ratio(self.weight_in_g, self.weight_out_g)
    }
}
