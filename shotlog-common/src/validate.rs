//! Validation result type
//!
//! Every entity exposes a `validate()` returning a `Validity`. Rules
//! accumulate: each failed rule contributes its own message naming the
//! offending field, and validation never short-circuits.

use crate::{Error, Result};

/// Structured validation outcome: a valid flag plus the full list of
/// rule failures.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Validity {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl Validity {
    /// A validity with no recorded failures.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Record a rule failure. Sets `is_valid` to false.
    pub fn push(&mut self, message: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(message.into());
    }

    /// Fold another validity's failures into this one.
    pub fn merge(&mut self, other: Validity) {
        if !other.is_valid {
            self.is_valid = false;
            self.errors.extend(other.errors);
        }
    }

    /// Convert to a `Result`, joining all messages into one
    /// `Error::Validation`. Used at the repository boundary.
    pub fn check(&self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(Error::Validation(self.errors.join("; ")))
        }
    }
}
