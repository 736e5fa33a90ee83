//! VNNLIB robustness property documents.
//!
//! A document declares one real-valued input `X_i` per region dimension and
//! one output `Y_c` per class, bounds every input by its interval, and
//! asserts that some other class scores at least as high as the true class.
//! A solver proving that disjunction UNSAT certifies the region robust.

use crate::format::format_real;
use serde::{Deserialize, Serialize};
use std::io::Write;
use vnnprop_core::{validate_labels, validate_region, Bound, RegionMode, Result, VnnError};

/// Which kind of region a document describes. Selects the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    /// Perturbation box around one sample.
    Plain,
    /// Hull of a prior region and the perturbation box.
    Merged,
    /// Overlap of a prior region and the perturbation box.
    Meet,
    /// Explicit bounds covering a batch of samples.
    Batch,
}

impl PropertyKind {
    /// Header comment, written as the first line of the document.
    ///
    /// The trailing spaces of the merged and meet headers are part of the
    /// established file format and are kept for byte-stable output.
    pub fn header(&self) -> &'static str {
        match self {
            PropertyKind::Plain | PropertyKind::Batch => {
                "; robustness verification of neural network"
            }
            PropertyKind::Merged => "; robustness verification of neural network (merged) ",
            PropertyKind::Meet => "; robustness verification of neural network (meet) ",
        }
    }

    /// Whether empty dimensions are rejected before writing.
    ///
    /// Meet regions are empty whenever the prior and the perturbation box are
    /// disjoint, and batch bounds come straight from the caller. Plain and
    /// merged regions can only be empty for samples outside the input range,
    /// which are written as computed.
    pub fn requires_nonempty_region(&self) -> bool {
        matches!(self, PropertyKind::Meet | PropertyKind::Batch)
    }
}

impl From<RegionMode> for PropertyKind {
    fn from(mode: RegionMode) -> Self {
        match mode {
            RegionMode::Plain => PropertyKind::Plain,
            RegionMode::Join => PropertyKind::Merged,
            RegionMode::Meet => PropertyKind::Meet,
        }
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyKind::Plain => write!(f, "plain"),
            PropertyKind::Merged => write!(f, "merged"),
            PropertyKind::Meet => write!(f, "meet"),
            PropertyKind::Batch => write!(f, "batch"),
        }
    }
}

/// A robustness property ready to be written.
#[derive(Debug, Clone, Copy)]
pub struct PropertyDocument<'a> {
    pub kind: PropertyKind,
    pub bounds: &'a [Bound],
    pub num_classes: usize,
    pub true_label: usize,
}

impl<'a> PropertyDocument<'a> {
    pub fn new(
        kind: PropertyKind,
        bounds: &'a [Bound],
        num_classes: usize,
        true_label: usize,
    ) -> Self {
        Self {
            kind,
            bounds,
            num_classes,
            true_label,
        }
    }

    /// Number of input variables.
    pub fn dims(&self) -> usize {
        self.bounds.len()
    }

    /// Check everything that could make the document invalid.
    ///
    /// Runs before the first byte is written, so a rejected document never
    /// leaves a partial file behind.
    pub fn validate(&self) -> Result<()> {
        validate_labels(self.num_classes, self.true_label)?;
        if let Some(dim) = self.bounds.iter().position(|b| !b.is_finite()) {
            return Err(VnnError::NonFiniteBound { dim });
        }
        if self.kind.requires_nonempty_region() {
            validate_region(self.bounds)?;
        }
        Ok(())
    }

    /// Validate, then write the whole document to `sink`.
    ///
    /// Sink errors are returned as [`VnnError::Io`] without retrying.
    pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
        self.validate()?;

        writeln!(sink, "{}", self.kind.header())?;

        for dim in 0..self.dims() {
            writeln!(sink, "(declare-const X_{dim} Real)")?;
        }
        writeln!(sink)?;
        for class in 0..self.num_classes {
            writeln!(sink, "(declare-const Y_{class} Real)")?;
        }
        writeln!(sink)?;

        for (dim, bound) in self.bounds.iter().enumerate() {
            writeln!(sink, "(assert (<= X_{dim} {}))", format_real(bound.upper))?;
            writeln!(sink, "(assert (>= X_{dim} {}))", format_real(bound.lower))?;
            writeln!(sink)?;
        }
        writeln!(sink)?;

        writeln!(sink, "(assert (or ")?;
        let label = self.true_label;
        for class in (0..self.num_classes).filter(|&c| c != label) {
            writeln!(sink, "\t(and (>= Y_{class} Y_{label}))")?;
        }
        writeln!(sink, "))")?;
        Ok(())
    }

    /// Render the document to a string.
    pub fn render(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        // Only ASCII is ever written.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
