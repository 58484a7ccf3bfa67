//! Witness type for confidence values bounded to [0.0, 1.0].
//!
//! # What Confidence Actually Means
//!
//! The resolution stages compute confidence in fundamentally different
//! ways. These numbers are NOT directly comparable!
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                 CONFIDENCE ACROSS RESOLUTION METHODS                 │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │                                                                      │
//! │  EXACT: "Did the normalized alias hit the index?"                    │
//! │  • Always 1.0. Deterministic. A collision warning, not a lower       │
//! │    score, marks ambiguity.                                           │
//! │                                                                      │
//! │  FUZZY: "How close was the best indexed alias?"                      │
//! │  • Token-sort similarity in [threshold, 1.0]. A ranking signal,      │
//! │    not a probability.                                                │
//! │                                                                      │
//! │  COREFERENCE: "How much do we trust the turn-history heuristic?"     │
//! │  • Fixed base value (default 0.7). Reflects the method, not the      │
//! │    instance.                                                         │
//! │                                                                      │
//! │  SPEAKER HEURISTICS: "How many behavioral signals fired?"            │
//! │  • Hit-count blends with per-heuristic caps. Comparable only         │
//! │    within a heuristic; the merge fold uses fixed priority, never     │
//! │    cross-heuristic score comparison.                                 │
//! │                                                                      │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Downstream consumers should threshold per method, not rank across
//! methods.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A confidence score guaranteed to be in the range [0.0, 1.0].
///
/// This is a "witness type" - its existence proves the value is valid.
/// Once you have a `Confidence`, you never need to check bounds again.
///
/// # Construction
///
/// - [`Confidence::new`]: Returns `None` if out of range (strict parsing)
/// - [`Confidence::saturating`]: Clamps to [0, 1] (lenient, never fails)
///
/// `Confidence` is `#[repr(transparent)]`: same memory layout as `f64`,
/// no runtime overhead.
///
/// # Example
///
/// ```rust
/// use chamber::types::Confidence;
///
/// assert!(Confidence::new(0.5).is_some());
/// assert!(Confidence::new(1.5).is_none());
///
/// let conf = Confidence::saturating(1.5);
/// assert_eq!(conf.get(), 1.0);
/// ```
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// The minimum valid confidence value.
    pub const MIN: Self = Self(0.0);

    /// The maximum valid confidence value.
    pub const MAX: Self = Self(1.0);

    /// A "perfect" confidence of 1.0 (deterministic exact match).
    pub const CERTAIN: Self = Self(1.0);

    /// Confidence of 0.0 (unresolved).
    pub const NONE: Self = Self(0.0);

    /// Create a confidence score, returning `None` if out of range.
    ///
    /// Use this when invalid values should be handled explicitly.
    #[must_use]
    #[inline]
    pub fn new(value: f64) -> Option<Self> {
        if (0.0..=1.0).contains(&value) && !value.is_nan() {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Create a confidence score, clamping to [0.0, 1.0].
    ///
    /// NaN is treated as 0.0.
    #[must_use]
    #[inline]
    pub fn saturating(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Get the inner value (guaranteed to be in [0.0, 1.0]).
    #[must_use]
    #[inline]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Check if this score passes a threshold.
    #[must_use]
    #[inline]
    pub fn meets(self, threshold: f64) -> bool {
        self.0 >= threshold
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Debug for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Confidence({:.4})", self.0)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Confidence> for f64 {
    #[inline]
    fn from(conf: Confidence) -> Self {
        conf.0
    }
}

impl PartialEq<f64> for Confidence {
    fn eq(&self, other: &f64) -> bool {
        (self.0 - other).abs() < f64::EPSILON
    }
}

impl PartialOrd<f64> for Confidence {
    fn partial_cmp(&self, other: &f64) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_valid() {
        assert!(Confidence::new(0.0).is_some());
        assert!(Confidence::new(0.5).is_some());
        assert!(Confidence::new(1.0).is_some());
    }

    #[test]
    fn new_invalid() {
        assert!(Confidence::new(-0.1).is_none());
        assert!(Confidence::new(1.1).is_none());
        assert!(Confidence::new(f64::NAN).is_none());
        assert!(Confidence::new(f64::INFINITY).is_none());
    }

    #[test]
    fn saturating_clamps() {
        assert_eq!(Confidence::saturating(0.5).get(), 0.5);
        assert_eq!(Confidence::saturating(-1.0).get(), 0.0);
        assert_eq!(Confidence::saturating(2.0).get(), 1.0);
        assert_eq!(Confidence::saturating(f64::NAN).get(), 0.0);
    }

    #[test]
    fn meets_threshold() {
        assert!(Confidence::saturating(0.75).meets(0.5));
        assert!(!Confidence::saturating(0.4).meets(0.5));
        assert!(Confidence::saturating(0.5).meets(0.5));
    }

    #[test]
    fn serde_roundtrip() {
        let conf = Confidence::new(0.85).unwrap();
        let json = serde_json::to_string(&conf).unwrap();
        assert_eq!(json, "0.85");
        let restored: Confidence = serde_json::from_str(&json).unwrap();
        assert!((restored.get() - 0.85).abs() < 1e-10);
    }

    #[test]
    fn constants() {
        assert_eq!(Confidence::MIN.get(), 0.0);
        assert_eq!(Confidence::MAX.get(), 1.0);
        assert_eq!(Confidence::CERTAIN.get(), 1.0);
        assert_eq!(Confidence::NONE.get(), 0.0);
    }
}
