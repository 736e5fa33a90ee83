//! VNNLIB output for local robustness properties.
//!
//! Turns a region computed by `vnnprop-core` into the VNNLIB text consumed by
//! neural network verifiers such as alpha-beta-CROWN, Marabou or nnenum.
//!
//! ## Usage
//!
//! ```ignore
//! use vnnprop_emit::{emit, RobustnessQuery};
//! use vnnprop_core::RegionMode;
//!
//! let query = RobustnessQuery { sample: &pixels, epsilon: 0.02, num_classes: 10, true_label: 7 };
//! emit(&mut std::io::stdout(), RegionMode::Plain, &query, None)?;
//! ```

pub mod document;
pub mod format;
pub mod naming;
pub mod writer;

pub use document::{PropertyDocument, PropertyKind};
pub use format::{format_real, format_shortest};
pub use naming::{batch_file_name, sample_file_name};
pub use writer::PropertyWriter;

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use vnnprop_core::{compute_region, Bound, PriorBounds, RegionMode, RegionSummary, Result};

/// Parameters of a robustness property around one sample.
#[derive(Debug, Clone, Copy)]
pub struct RobustnessQuery<'a> {
    /// Flattened input sample.
    pub sample: &'a [f64],
    /// L-infinity perturbation budget.
    pub epsilon: f64,
    /// Number of classifier outputs.
    pub num_classes: usize,
    /// Ground-truth class index.
    pub true_label: usize,
}

/// A property written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrittenProperty {
    pub path: PathBuf,
    pub kind: PropertyKind,
    pub true_label: usize,
    pub summary: RegionSummary,
}

/// Compute the region of `query` under `mode` and write its property to `sink`.
///
/// Nothing is written unless the whole property is valid.
pub fn emit<W: Write + ?Sized>(
    sink: &mut W,
    mode: RegionMode,
    query: &RobustnessQuery<'_>,
    priors: Option<&dyn PriorBounds>,
) -> Result<RegionSummary> {
    let bounds = compute_region(mode, query.sample, query.epsilon, priors)?;
    PropertyDocument::new(
        PropertyKind::from(mode),
        &bounds,
        query.num_classes,
        query.true_label,
    )
    .write_to(sink)?;
    Ok(RegionSummary::of(&bounds, &Bound::UNIT))
}
