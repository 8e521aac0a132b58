//! Portafilter basket configuration

use crate::validate::Validity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weight ranges for a basket size. The active configuration's ranges
/// drive shot-form validation and the brew-ratio typicality band.
///
/// At most one configuration is active; activating a new one deactivates
/// the rest. Saving bounds identical to an existing row reactivates that
/// row instead of inserting a duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketConfiguration {
    pub id: Uuid,
    pub coffee_in_min_g: f64,
    pub coffee_in_max_g: f64,
    pub coffee_out_min_g: f64,
    pub coffee_out_max_g: f64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl BasketConfiguration {
    pub fn new(
        coffee_in_min_g: f64,
        coffee_in_max_g: f64,
        coffee_out_min_g: f64,
        coffee_out_max_g: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            coffee_in_min_g,
            coffee_in_max_g,
            coffee_out_min_g,
            coffee_out_max_g,
            active: true,
            created_at,
        }
    }

    /// Whether another configuration covers the same four bounds.
    pub fn same_range(&self, other: &BasketConfiguration) -> bool {
        self.coffee_in_min_g == other.coffee_in_min_g
            && self.coffee_in_max_g == other.coffee_in_max_g
            && self.coffee_out_min_g == other.coffee_out_min_g
            && self.coffee_out_max_g == other.coffee_out_max_g
    }

    pub fn validate(&self) -> Validity {
        let mut validity = Validity::valid();

        if self.coffee_in_min_g <= 0.0 || self.coffee_in_max_g <= 0.0 {
            validity.push("coffee-in bounds must be positive");
        }
        if self.coffee_out_min_g <= 0.0 || self.coffee_out_max_g <= 0.0 {
            validity.push("coffee-out bounds must be positive");
        }
        // min == max is a degenerate range, also invalid.
        if self.coffee_in_min_g >= self.coffee_in_max_g {
            validity.push("coffee-in minimum must be less than coffee-in maximum");
        }
        if self.coffee_out_min_g >= self.coffee_out_max_g {
            validity.push("coffee-out minimum must be less than coffee-out maximum");
        }

        validity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basket(in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> BasketConfiguration {
        BasketConfiguration::new(in_min, in_max, out_min, out_max, Utc::now())
    }

    #[test]
    fn ordered_positive_ranges_pass() {
        assert!(basket(14.0, 22.0, 28.0, 55.0).validate().is_valid);
    }

    #[test]
    fn non_positive_bounds_fail() {
        assert!(!basket(0.0, 22.0, 28.0, 55.0).validate().is_valid);
        assert!(!basket(14.0, 22.0, -1.0, 55.0).validate().is_valid);
    }

    #[test]
    fn degenerate_range_fails() {
        assert!(!basket(18.0, 18.0, 28.0, 55.0).validate().is_valid);
        assert!(!basket(14.0, 22.0, 36.0, 36.0).validate().is_valid);
    }

    #[test]
    fn same_range_ignores_identity_and_active_flag() {
        let a = basket(14.0, 22.0, 28.0, 55.0);
        let mut b = basket(14.0, 22.0, 28.0, 55.0);
        b.active = false;
        assert!(a.same_range(&b));
        assert!(!a.same_range(&basket(14.0, 20.0, 28.0, 55.0)));
    }
}
