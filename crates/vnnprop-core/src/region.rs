//! Region combinators: the input box of a robustness property.
//!
//! Every input dimension `i` gets an effective interval derived from the
//! sample value `x_i`, the perturbation budget `ε` and, for the merging
//! modes, a prior interval `[p_lo, p_hi]`:
//!
//! | Mode    | lower                       | upper                       |
//! |---------|-----------------------------|-----------------------------|
//! | `Plain` | `max(0, x - ε)`             | `min(1, x + ε)`             |
//! | `Join`  | `max(0, min(p_lo, x - ε))`  | `min(1, max(p_hi, x + ε))`  |
//! | `Meet`  | `max(0, max(p_lo, x - ε))`  | `min(1, min(p_hi, x + ε))`  |
//!
//! `Join` is a sound over-approximation when several properties are merged
//! into one file: anything proven for the joined region holds for each
//! sub-region. `Meet` narrows to the overlap and yields an empty interval
//! when the two windows are disjoint; [`validate_region`] rejects those.

use crate::{Bound, GlobalRange, PriorBounds, Result, VnnError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How the sample's perturbation box is combined with a prior region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionMode {
    /// Perturbation box only.
    Plain,
    /// Convex hull of the prior region and the perturbation box.
    Join,
    /// Intersection of the prior region and the perturbation box.
    Meet,
}

impl RegionMode {
    pub fn name(&self) -> &'static str {
        match self {
            RegionMode::Plain => "plain",
            RegionMode::Join => "join",
            RegionMode::Meet => "meet",
        }
    }

    /// Whether this mode reads a prior interval.
    pub fn needs_prior(&self) -> bool {
        !matches!(self, RegionMode::Plain)
    }

    /// Effective interval for one dimension.
    ///
    /// `prior` is ignored in `Plain` mode. In `Join`/`Meet` mode a missing
    /// prior falls back to the plain box; [`compute_region`] guarantees one
    /// is always present.
    #[inline]
    pub fn combine(
        &self,
        sample: f64,
        epsilon: f64,
        prior: Option<Bound>,
        range: &GlobalRange,
    ) -> Bound {
        let window = Bound::around(sample, epsilon);
        let combined = match (self, prior) {
            (RegionMode::Join, Some(prior)) => prior.join(&window),
            (RegionMode::Meet, Some(prior)) => prior.meet(&window),
            _ => window,
        };
        combined.clip(range)
    }
}

impl std::fmt::Display for RegionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Perturbation box around `sample`, clipped to the unit range.
#[inline]
pub fn plain_interval(sample: f64, epsilon: f64) -> Bound {
    RegionMode::Plain.combine(sample, epsilon, None, &Bound::UNIT)
}

/// Hull of the prior interval and the perturbation box, clipped to the unit range.
#[inline]
pub fn join_interval(sample: f64, epsilon: f64, prior_lower: f64, prior_upper: f64) -> Bound {
    RegionMode::Join.combine(
        sample,
        epsilon,
        Some(Bound::new(prior_lower, prior_upper)),
        &Bound::UNIT,
    )
}

/// Overlap of the prior interval and the perturbation box, clipped to the unit range.
///
/// The result is empty (`lower > upper`) when the two windows are disjoint.
#[inline]
pub fn meet_interval(sample: f64, epsilon: f64, prior_lower: f64, prior_upper: f64) -> Bound {
    RegionMode::Meet.combine(
        sample,
        epsilon,
        Some(Bound::new(prior_lower, prior_upper)),
        &Bound::UNIT,
    )
}

/// Reject negative or non-finite perturbation budgets.
pub fn validate_epsilon(epsilon: f64) -> Result<()> {
    if epsilon.is_finite() && epsilon >= 0.0 {
        Ok(())
    } else {
        Err(VnnError::InvalidEpsilon(epsilon))
    }
}

/// Check the class parameters of the output disjunction.
pub fn validate_labels(num_classes: usize, true_label: usize) -> Result<()> {
    if num_classes == 0 {
        return Err(VnnError::NoClasses);
    }
    if true_label >= num_classes {
        return Err(VnnError::InvalidLabel {
            label: true_label,
            num_classes,
        });
    }
    Ok(())
}

/// Strict input check: every sample value must lie inside `range`.
///
/// Not applied by [`compute_region`]; out-of-range samples there produce
/// boxes that are only clipped on one side.
pub fn validate_sample(sample: &[f64], range: &GlobalRange) -> Result<()> {
    for (dim, &value) in sample.iter().enumerate() {
        if !value.is_finite() {
            return Err(VnnError::NonFiniteSample { dim });
        }
        if !range.contains(value) {
            return Err(VnnError::SampleOutOfRange {
                dim,
                value,
                lower: range.lower,
                upper: range.upper,
            });
        }
    }
    Ok(())
}

/// Fail with [`VnnError::InvalidRegion`] on the first empty dimension.
pub fn validate_region(bounds: &[Bound]) -> Result<()> {
    match bounds.iter().position(Bound::is_empty) {
        Some(dim) => {
            let b = bounds[dim];
            Err(VnnError::InvalidRegion {
                dim,
                lower: b.lower,
                upper: b.upper,
            })
        }
        None => Ok(()),
    }
}

/// Effective interval of every dimension of `sample`, clipped to the unit range.
///
/// The result is not validated: a `Meet` region may contain empty
/// dimensions. Pass it through [`validate_region`] before emitting.
pub fn compute_region(
    mode: RegionMode,
    sample: &[f64],
    epsilon: f64,
    priors: Option<&dyn PriorBounds>,
) -> Result<Vec<Bound>> {
    validate_epsilon(epsilon)?;
    if let Some(dim) = sample.iter().position(|v| !v.is_finite()) {
        return Err(VnnError::NonFiniteSample { dim });
    }

    let priors = if mode.needs_prior() {
        let priors = priors.ok_or(VnnError::MissingPrior(mode.name()))?;
        if priors.dims() != sample.len() {
            return Err(VnnError::PriorDimensionMismatch {
                expected: sample.len(),
                got: priors.dims(),
            });
        }
        // f64::min/max drop NaN operands.
        if let Some(dim) =
            (0..priors.dims()).find(|&dim| priors.prior(dim).is_some_and(|b| !b.is_finite()))
        {
            return Err(VnnError::NonFinitePrior { dim });
        }
        Some(priors)
    } else {
        None
    };

    let bounds: Vec<Bound> = sample
        .iter()
        .enumerate()
        .map(|(dim, &x)| {
            let prior = priors.and_then(|p| p.prior(dim));
            mode.combine(x, epsilon, prior, &Bound::UNIT)
        })
        .collect();

    let summary = RegionSummary::of(&bounds, &Bound::UNIT);
    debug!(
        mode = mode.name(),
        dims = summary.dims,
        degenerate = summary.degenerate,
        empty = summary.empty,
        "Computed region"
    );
    if summary.empty > 0 {
        warn!(
            mode = mode.name(),
            empty = summary.empty,
            "Region has empty dimensions"
        );
    }
    Ok(bounds)
}

/// Hull of the plain perturbation boxes of several samples.
///
/// Gives a batch property whose region covers every sample's box.
pub fn hull_of_samples<S: AsRef<[f64]>>(samples: &[S], epsilon: f64) -> Result<Vec<Bound>> {
    let (first, rest) = samples.split_first().ok_or(VnnError::EmptyBatch)?;
    let mut hull = compute_region(RegionMode::Plain, first.as_ref(), epsilon, None)?;

    for (offset, sample) in rest.iter().enumerate() {
        let sample = sample.as_ref();
        if sample.len() != hull.len() {
            return Err(VnnError::RaggedSamples {
                index: offset + 1,
                expected: hull.len(),
                got: sample.len(),
            });
        }
        let boxes = compute_region(RegionMode::Plain, sample, epsilon, None)?;
        for (acc, b) in hull.iter_mut().zip(&boxes) {
            *acc = acc.join(b);
        }
    }

    debug!(
        samples = samples.len(),
        dims = hull.len(),
        "Computed batch hull"
    );
    Ok(hull)
}

/// Pair up separately stored lower and upper tables.
pub fn zip_bounds(lower: &[f64], upper: &[f64]) -> Result<Vec<Bound>> {
    if lower.len() != upper.len() {
        return Err(VnnError::BoundsLengthMismatch {
            lower: lower.len(),
            upper: upper.len(),
        });
    }
    Ok(lower
        .iter()
        .zip(upper)
        .map(|(&l, &u)| Bound::new(l, u))
        .collect())
}

/// Shape statistics of a computed region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSummary {
    /// Number of dimensions.
    pub dims: usize,
    /// Dimensions whose interval collapsed to a point.
    pub degenerate: usize,
    /// Dimensions whose interval is empty.
    pub empty: usize,
    /// Dimensions not enclosed by the global range.
    pub out_of_range: usize,
}

impl RegionSummary {
    pub fn of(bounds: &[Bound], range: &GlobalRange) -> Self {
        bounds.iter().fold(
            RegionSummary {
                dims: bounds.len(),
                ..Default::default()
            },
            |mut acc, b| {
                if b.is_empty() {
                    acc.empty += 1;
                } else {
                    if b.is_degenerate() {
                        acc.degenerate += 1;
                    }
                    if !range.encloses(b) {
                        acc.out_of_range += 1;
                    }
                }
                acc
            },
        )
    }
}
