//! Domain models
//!
//! Entity structs with their field-validation primitives. All `validate()`
//! methods are pure: "today" is passed in, never read from the system
//! clock directly.

mod basket;
mod bean;
mod grinder;
mod recommendation;
mod shot;
mod taste;

pub use basket::BasketConfiguration;
pub use bean::Bean;
pub use grinder::GrinderConfiguration;
pub use recommendation::{Confidence, GrindAdjustment, GrindRecommendation, ShotRecommendation};
pub use shot::Shot;
pub use taste::{TastePrimary, TasteSecondary};

/// Shared field limits across entities.
pub const NAME_MAX_CHARS: usize = 100;
pub const NOTES_MAX_CHARS: usize = 500;
pub const GRINDER_SETTING_MAX_CHARS: usize = 50;
pub const PHOTO_PATH_MAX_CHARS: usize = 500;
