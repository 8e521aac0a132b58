//! Brew math
//!
//! Pure calculators for brew ratio, extraction-time optimality, and
//! taste-driven grind adjustments. All thresholds are carried in
//! [`BrewTuning`]; the literal defaults apply only when no active basket
//! configuration exists, otherwise the basket's weight extremes are the
//! source of truth.

use crate::models::{BasketConfiguration, GrindAdjustment, TastePrimary, TasteSecondary};
use serde::{Deserialize, Serialize};

/// Brew ratio `weight_out / weight_in`, undefined for non-positive input
/// weight. Never divides by zero.
pub fn brew_ratio(weight_in_g: f64, weight_out_g: f64) -> Option<f64> {
    if weight_in_g > 0.0 {
        Some(weight_out_g / weight_in_g)
    } else {
        None
    }
}

/// Render a ratio as `1:<ratio to one decimal place>`.
///
/// ```
/// use shotlog_common::brew::format_brew_ratio;
///
/// assert_eq!(format_brew_ratio(2.0), "1:2.0");
/// assert_eq!(format_brew_ratio(2.47), "1:2.5");
/// ```
pub fn format_brew_ratio(ratio: f64) -> String {
    format!("1:{:.1}", ratio)
}

/// Render an extraction time as `m:ss`, rounding to the nearest second.
///
/// ```
/// use shotlog_common::brew::format_extraction_time;
///
/// assert_eq!(format_extraction_time(27.0), "0:27");
/// assert_eq!(format_extraction_time(92.6), "1:33");
/// ```
pub fn format_extraction_time(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as i64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Inclusive brew-ratio typicality band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioBand {
    pub min: f64,
    pub max: f64,
}

impl RatioBand {
    /// Derive the band from a basket configuration's weight extremes:
    /// the least concentrated achievable ratio down to the most.
    pub fn from_basket(basket: &BasketConfiguration) -> Self {
        Self {
            min: basket.coffee_out_min_g / basket.coffee_in_max_g,
            max: basket.coffee_out_max_g / basket.coffee_in_min_g,
        }
    }

    /// Inclusive at both ends.
    pub fn is_typical(&self, ratio: f64) -> bool {
        ratio >= self.min && ratio <= self.max
    }
}

impl Default for RatioBand {
    fn default() -> Self {
        Self { min: 1.5, max: 3.0 }
    }
}

/// Inclusive optimal extraction-time window in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractionWindow {
    pub min_seconds: f64,
    pub max_seconds: f64,
}

impl ExtractionWindow {
    /// Inclusive at both ends.
    pub fn is_optimal(&self, seconds: f64) -> bool {
        seconds >= self.min_seconds && seconds <= self.max_seconds
    }
}

impl Default for ExtractionWindow {
    fn default() -> Self {
        Self {
            min_seconds: 25.0,
            max_seconds: 30.0,
        }
    }
}

/// Valid weight ranges for shot validation, in grams.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightLimits {
    pub in_min_g: f64,
    pub in_max_g: f64,
    pub out_min_g: f64,
    pub out_max_g: f64,
}

impl WeightLimits {
    /// Use the active basket configuration's bounds as the valid range.
    pub fn from_basket(basket: &BasketConfiguration) -> Self {
        Self {
            in_min_g: basket.coffee_in_min_g,
            in_max_g: basket.coffee_in_max_g,
            out_min_g: basket.coffee_out_min_g,
            out_max_g: basket.coffee_out_max_g,
        }
    }
}

impl Default for WeightLimits {
    fn default() -> Self {
        Self {
            in_min_g: 0.1,
            in_max_g: 50.0,
            out_min_g: 0.1,
            out_max_g: 100.0,
        }
    }
}

/// All brew thresholds in one place.
///
/// When an active basket configuration exists its ranges win; the
/// `Default` literals are the fallback for an unconfigured setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrewTuning {
    pub ratio_band: RatioBand,
    pub extraction_window: ExtractionWindow,
    pub weight_limits: WeightLimits,
    /// Grinder-scale step applied per taste adjustment.
    pub grind_step: f64,
    /// Dose step in grams applied per weak/strong signal.
    pub dose_step_g: f64,
}

impl BrewTuning {
    /// Tuning for the given active basket configuration, or the literal
    /// defaults when none exists.
    pub fn for_basket(basket: Option<&BasketConfiguration>) -> Self {
        match basket {
            Some(b) => Self {
                ratio_band: RatioBand::from_basket(b),
                weight_limits: WeightLimits::from_basket(b),
                ..Self::default()
            },
            None => Self::default(),
        }
    }
}

impl Default for BrewTuning {
    fn default() -> Self {
        Self {
            ratio_band: RatioBand::default(),
            extraction_window: ExtractionWindow::default(),
            weight_limits: WeightLimits::default(),
            grind_step: 0.5,
            dose_step_g: 0.5,
        }
    }
}

/// Preselect a taste classification from extraction timing alone.
///
/// Faster than the optimal window reads as under-extracted (sour), slower
/// as over-extracted (bitter). Inside the window there is no strong signal.
pub fn preselect_taste(extraction_seconds: f64, window: &ExtractionWindow) -> Option<TastePrimary> {
    if extraction_seconds < window.min_seconds {
        Some(TastePrimary::Sour)
    } else if extraction_seconds > window.max_seconds {
        Some(TastePrimary::Bitter)
    } else {
        None
    }
}

/// Map a primary taste to a grind adjustment. Exhaustive by construction:
/// sour means under-extraction (grind finer), bitter means over-extraction
/// (grind coarser), perfect means hold.
pub fn adjustment_for(taste: TastePrimary) -> GrindAdjustment {
    match taste {
        TastePrimary::Sour => GrindAdjustment::Finer,
        TastePrimary::Bitter => GrindAdjustment::Coarser,
        TastePrimary::Perfect => GrindAdjustment::Hold,
    }
}

/// Apply an adjustment to a stored grinder setting.
///
/// Numeric settings move by `step` on the grinder scale; lower numbers are
/// finer, the common burr-grinder convention. Non-numeric settings cannot
/// be adjusted arithmetically and yield `None` (caller falls back to a
/// textual hint).
pub fn apply_adjustment(setting: &str, adjustment: GrindAdjustment, step: f64) -> Option<String> {
    let value: f64 = setting.trim().parse().ok()?;
    let adjusted = match adjustment {
        GrindAdjustment::Finer => value - step,
        GrindAdjustment::Coarser => value + step,
        GrindAdjustment::Hold => value,
    };
    Some(format_setting(adjusted))
}

/// Dose delta in grams suggested by the secondary taste signal: a weak
/// shot wants more coffee, a strong one less.
pub fn dose_delta_for(secondary: TasteSecondary, dose_step_g: f64) -> f64 {
    match secondary {
        TasteSecondary::Weak => dose_step_g,
        TasteSecondary::Strong => -dose_step_g,
    }
}

/// Format a numeric setting the way users write them: no trailing `.0`
/// on whole numbers.
fn format_setting(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
