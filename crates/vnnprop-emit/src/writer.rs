//! File-backed property output.

use crate::document::{PropertyDocument, PropertyKind};
use crate::naming::{batch_file_name, sample_file_name};
use crate::{RobustnessQuery, WrittenProperty};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use vnnprop_core::{
    compute_region, hull_of_samples, validate_epsilon, zip_bounds, Bound, PriorBounds, RegionMode,
    RegionSummary, Result,
};

/// Writes properties as `.vnnlib` files into a caller-chosen directory.
///
/// The directory must already exist unless [`PropertyWriter::create_missing_dir`]
/// is set, in which case it is created after the property validates. Each
/// property gets a distinct name derived from its parameters; an existing
/// file with the same name is replaced.
#[derive(Debug, Clone)]
pub struct PropertyWriter {
    out_dir: PathBuf,
    create_dir: bool,
}

impl PropertyWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            create_dir: false,
        }
    }

    /// Create the output directory on the first valid write.
    pub fn create_missing_dir(mut self, create: bool) -> Self {
        self.create_dir = create;
        self
    }

    /// Write the robustness property of one sample.
    ///
    /// `priors` is required for [`RegionMode::Join`] and [`RegionMode::Meet`].
    pub fn write_sample(
        &self,
        mode: RegionMode,
        sample_id: usize,
        query: &RobustnessQuery<'_>,
        priors: Option<&dyn PriorBounds>,
    ) -> Result<WrittenProperty> {
        let bounds = compute_region(mode, query.sample, query.epsilon, priors)?;
        let name = sample_file_name(mode, sample_id, query.true_label, query.epsilon);
        let doc = PropertyDocument::new(
            PropertyKind::from(mode),
            &bounds,
            query.num_classes,
            query.true_label,
        );
        self.persist(&doc, &name)
    }

    /// Write a batch property with explicit lower and upper tables.
    ///
    /// Bounds are written as given, without clipping.
    pub fn write_export(
        &self,
        lower: &[f64],
        upper: &[f64],
        num_samples: usize,
        num_classes: usize,
        true_label: usize,
        epsilon: f64,
    ) -> Result<WrittenProperty> {
        let bounds = zip_bounds(lower, upper)?;
        self.write_batch(&bounds, num_samples, num_classes, true_label, epsilon)
    }

    /// Write a batch property covering the perturbation boxes of `samples`.
    pub fn write_hull<S: AsRef<[f64]>>(
        &self,
        samples: &[S],
        num_classes: usize,
        true_label: usize,
        epsilon: f64,
    ) -> Result<WrittenProperty> {
        let bounds = hull_of_samples(samples, epsilon)?;
        self.write_batch(&bounds, samples.len(), num_classes, true_label, epsilon)
    }

    fn write_batch(
        &self,
        bounds: &[Bound],
        num_samples: usize,
        num_classes: usize,
        true_label: usize,
        epsilon: f64,
    ) -> Result<WrittenProperty> {
        validate_epsilon(epsilon)?;
        let name = batch_file_name(true_label, epsilon, num_samples);
        let doc = PropertyDocument::new(PropertyKind::Batch, bounds, num_classes, true_label);
        self.persist(&doc, &name)
    }

    fn persist(&self, doc: &PropertyDocument<'_>, name: &str) -> Result<WrittenProperty> {
        // Validate before the file is created so rejected properties leave nothing behind.
        doc.validate()?;

        if self.create_dir {
            fs::create_dir_all(&self.out_dir)?;
        }
        let path = self.out_dir.join(name);
        debug!(path = %path.display(), kind = %doc.kind, "Writing property");

        let mut out = BufWriter::new(File::create(&path)?);
        doc.write_to(&mut out)?;
        out.flush()?;

        let summary = RegionSummary::of(doc.bounds, &Bound::UNIT);
        info!(
            path = %path.display(),
            kind = %doc.kind,
            dims = summary.dims,
            classes = doc.num_classes,
            "Wrote property"
        );
        Ok(WrittenProperty {
            path,
            kind: doc.kind,
            true_label: doc.true_label,
            summary,
        })
    }
}
