//! Grinder scale configuration

use crate::validate::Validity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Plausible range for grinder scale endpoints.
const SCALE_MIN: f64 = 0.0;
const SCALE_MAX: f64 = 1000.0;

/// The usable range of a grinder's adjustment scale.
///
/// Historical rows may accumulate; the newest one is treated as current.
/// Saving bounds identical to an existing row is an idempotent no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrinderConfiguration {
    pub id: Uuid,
    pub scale_min: f64,
    pub scale_max: f64,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl GrinderConfiguration {
    pub fn new(scale_min: f64, scale_max: f64, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            scale_min,
            scale_max,
            notes: String::new(),
            created_at,
        }
    }

    pub fn validate(&self) -> Validity {
        let mut validity = Validity::valid();

        if self.scale_min >= self.scale_max {
            validity.push("scale minimum must be less than scale maximum");
        }
        if self.scale_min < SCALE_MIN || self.scale_min > SCALE_MAX {
            validity.push(format!(
                "scale minimum must be between {} and {}",
                SCALE_MIN, SCALE_MAX
            ));
        }
        if self.scale_max < SCALE_MIN || self.scale_max > SCALE_MAX {
            validity.push(format!(
                "scale maximum must be between {} and {}",
                SCALE_MIN, SCALE_MAX
            ));
        }

        validity
    }
}
