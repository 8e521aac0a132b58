//! Coffee bean profile

use super::{GRINDER_SETTING_MAX_CHARS, NAME_MAX_CHARS, NOTES_MAX_CHARS, PHOTO_PATH_MAX_CHARS};
use crate::validate::Validity;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Characters never allowed in a stored photo path.
const PHOTO_PATH_FORBIDDEN: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// How far back a roast date may lie.
const ROAST_MAX_AGE_DAYS: i64 = 365;

/// Inclusive freshness window in days since roast.
const FRESH_MIN_DAYS: i64 = 4;
const FRESH_MAX_DAYS: i64 = 21;

/// A bag of beans: the profile shots are recorded against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bean {
    pub id: Uuid,
    /// Unique across all beans, active or not. Case-sensitive exact match,
    /// enforced at the repository layer.
    pub name: String,
    pub roast_date: NaiveDate,
    pub notes: String,
    pub active: bool,
    /// Grinder setting memorized from the most recent shot recorded
    /// against this bean.
    pub last_grinder_setting: Option<String>,
    /// Path to a stored photo file, owned by this bean and removed with it.
    pub photo_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Bean {
    pub fn new(name: impl Into<String>, roast_date: NaiveDate, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            roast_date,
            notes: String::new(),
            active: true,
            last_grinder_setting: None,
            photo_path: None,
            created_at,
        }
    }

    /// Field validation. `today` is injected so tests are deterministic.
    pub fn validate(&self, today: NaiveDate) -> Validity {
        let mut validity = Validity::valid();

        if self.name.trim().is_empty() {
            validity.push("name must not be blank");
        }
        if self.name.chars().count() > NAME_MAX_CHARS {
            validity.push(format!("name must be at most {} characters", NAME_MAX_CHARS));
        }

        if self.roast_date > today {
            validity.push("roast date must not be in the future");
        }
        if self.days_since_roast(today) > ROAST_MAX_AGE_DAYS {
            validity.push(format!(
                "roast date must not be more than {} days in the past",
                ROAST_MAX_AGE_DAYS
            ));
        }

        if self.notes.chars().count() > NOTES_MAX_CHARS {
            validity.push(format!("notes must be at most {} characters", NOTES_MAX_CHARS));
        }

        if let Some(setting) = &self.last_grinder_setting {
            if setting.chars().count() > GRINDER_SETTING_MAX_CHARS {
                validity.push(format!(
                    "last grinder setting must be at most {} characters",
                    GRINDER_SETTING_MAX_CHARS
                ));
            }
        }

        if let Some(path) = &self.photo_path {
            validity.merge(validate_photo_path(path));
        }

        validity
    }

    /// Days elapsed since the roast date. Negative for future dates.
    pub fn days_since_roast(&self, today: NaiveDate) -> i64 {
        (today - self.roast_date).num_days()
    }

    /// Beans rest a few days after roasting and fade after three weeks.
    pub fn is_fresh(&self, today: NaiveDate) -> bool {
        let days = self.days_since_roast(today);
        (FRESH_MIN_DAYS..=FRESH_MAX_DAYS).contains(&days)
    }
}

fn validate_photo_path(path: &str) -> Validity {
    let mut validity = Validity::valid();

    if path.is_empty() {
        validity.push("photo path must not be blank when present");
    }
    if path.chars().count() > PHOTO_PATH_MAX_CHARS {
        validity.push(format!(
            "photo path must be at most {} characters",
            PHOTO_PATH_MAX_CHARS
        ));
    }
    if path.contains("..") {
        validity.push("photo path must not contain directory traversal");
    }
    if path.contains(PHOTO_PATH_FORBIDDEN) {
        validity.push("photo path must not contain <>:\"|?* characters");
    }
    if path != path.trim() {
        validity.push("photo path must not have leading or trailing whitespace");
    }

    validity
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn bean(roast_offset_days: i64) -> Bean {
        Bean::new(
            "Ethiopia Yirgacheffe",
            today() - Duration::days(roast_offset_days),
            Utc::now(),
        )
    }

    #[test]
    fn fresh_bean_passes() {
        let v = bean(7).validate(today());
        assert!(v.is_valid, "unexpected errors: {:?}", v.errors);
    }

    #[test]
    fn blank_name_mentions_name() {
        let mut b = bean(7);
        b.name = "   ".into();
        let v = b.validate(today());
        assert!(!v.is_valid);
        assert!(v.errors.iter().any(|e| e.contains("name")));
    }

    #[test]
    fn overlong_name_is_invalid() {
        let mut b = bean(7);
        b.name = "x".repeat(101);
        assert!(!b.validate(today()).is_valid);
    }

    #[test]
    fn future_roast_date_is_invalid() {
        assert!(!bean(-1).validate(today()).is_valid);
    }

    #[test]
    fn roast_date_400_days_back_is_invalid() {
        assert!(!bean(400).validate(today()).is_valid);
    }

    #[test]
    fn roast_date_exactly_365_days_back_is_valid() {
        assert!(bean(365).validate(today()).is_valid);
    }

    #[test]
    fn multiple_failures_all_reported() {
        let mut b = bean(-1);
        b.name = String::new();
        b.notes = "n".repeat(501);
        let v = b.validate(today());
        assert_eq!(v.errors.len(), 3);
    }

    #[test]
    fn photo_path_rules() {
        let mut b = bean(7);

        b.photo_path = Some("photos/bean.jpg".into());
        assert!(b.validate(today()).is_valid);

        b.photo_path = Some("../etc/passwd".into());
        assert!(!b.validate(today()).is_valid);

        b.photo_path = Some("photos/what?.jpg".into());
        assert!(!b.validate(today()).is_valid);

        b.photo_path = Some(" photos/bean.jpg".into());
        assert!(!b.validate(today()).is_valid);

        b.photo_path = Some(String::new());
        assert!(!b.validate(today()).is_valid);
    }

    #[test]
    fn days_since_roast_is_ordinal_difference() {
        assert_eq!(bean(7).days_since_roast(today()), 7);
        assert_eq!(bean(0).days_since_roast(today()), 0);
        assert_eq!(bean(-3).days_since_roast(today()), -3);
    }

    #[test]
    fn freshness_window_is_4_to_21_days_inclusive() {
        assert!(!bean(3).is_fresh(today()));
        assert!(bean(4).is_fresh(today()));
        assert!(bean(12).is_fresh(today()));
        assert!(bean(21).is_fresh(today()));
        assert!(!bean(22).is_fresh(today()));
    }
}
