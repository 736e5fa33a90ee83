//! Core types for vnnprop robustness properties.
//!
//! This crate provides the interval algebra used to build the input region of
//! a local robustness property: a per-dimension [`Bound`], the combinators
//! that merge a sample's perturbation box with a prior region
//! ([`RegionMode`]), and the validation steps that run before anything is
//! written.

pub mod error;
pub mod prior;
pub mod region;

pub use error::{Result, VnnError};
pub use prior::PriorBounds;
pub use region::{
    compute_region, hull_of_samples, join_interval, meet_interval, plain_interval,
    validate_epsilon, validate_labels, validate_region, validate_sample, zip_bounds, RegionMode,
    RegionSummary,
};

use serde::{Deserialize, Serialize};

/// A closed interval on a scalar input: [lower, upper].
///
/// Unlike most interval types, a `Bound` may be empty (`lower > upper`): the
/// meet combinator produces one when the prior and the perturbation box are
/// disjoint, and [`validate_region`] is responsible for rejecting it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub lower: f64,
    pub upper: f64,
}

/// The valid domain of every input variable.
pub type GlobalRange = Bound;

impl Bound {
    /// Normalized pixel intensities.
    pub const UNIT: Bound = Bound {
        lower: 0.0,
        upper: 1.0,
    };

    /// Create a new bound.
    #[inline]
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// The L-infinity ball of radius `epsilon` around `center`, unclipped.
    #[inline]
    pub fn around(center: f64, epsilon: f64) -> Self {
        Self {
            lower: center - epsilon,
            upper: center + epsilon,
        }
    }

    /// Check if this bound contains a value.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Check if `other` lies entirely inside this bound.
    #[inline]
    pub fn encloses(&self, other: &Bound) -> bool {
        self.lower <= other.lower && other.upper <= self.upper
    }

    /// Whether the bound describes an empty set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lower > self.upper
    }

    /// Whether the bound collapsed to a single point.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.lower == self.upper
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    /// Intersection of two bounds, which may be empty.
    #[inline]
    pub fn meet(&self, other: &Bound) -> Bound {
        Bound {
            lower: self.lower.max(other.lower),
            upper: self.upper.min(other.upper),
        }
    }

    /// Union of two bounds (convex hull).
    #[inline]
    pub fn join(&self, other: &Bound) -> Bound {
        Bound {
            lower: self.lower.min(other.lower),
            upper: self.upper.max(other.upper),
        }
    }

    /// Clip each endpoint against `range`.
    ///
    /// Endpoints are clipped independently: the lower end is raised to
    /// `range.lower` and the upper end is lowered to `range.upper`. A bound
    /// lying entirely outside `range` is therefore only clipped on one side.
    #[inline]
    pub fn clip(&self, range: &GlobalRange) -> Bound {
        Bound {
            lower: self.lower.max(range.lower),
            upper: self.upper.min(range.upper),
        }
    }
}

impl From<(f64, f64)> for Bound {
    fn from((lower, upper): (f64, f64)) -> Self {
        Self::new(lower, upper)
    }
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}
