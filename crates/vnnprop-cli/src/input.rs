//! JSON inputs: samples, prior tables and bound tables.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::path::Path;
use vnnprop_core::Bound;

/// A flattened sample, either a bare array or a record carrying its label.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SampleFile {
    Pixels(Vec<f64>),
    Record {
        pixels: Vec<f64>,
        #[serde(default)]
        label: Option<usize>,
        #[serde(default)]
        id: Option<usize>,
    },
}

impl SampleFile {
    pub fn pixels(&self) -> &[f64] {
        match self {
            SampleFile::Pixels(p) | SampleFile::Record { pixels: p, .. } => p,
        }
    }

    pub fn into_pixels(self) -> Vec<f64> {
        match self {
            SampleFile::Pixels(p) | SampleFile::Record { pixels: p, .. } => p,
        }
    }

    pub fn label(&self) -> Option<usize> {
        match self {
            SampleFile::Pixels(_) => None,
            SampleFile::Record { label, .. } => *label,
        }
    }

    pub fn id(&self) -> Option<usize> {
        match self {
            SampleFile::Pixels(_) => None,
            SampleFile::Record { id, .. } => *id,
        }
    }
}

/// One prior interval: `[low, high]` or `{"lower": .., "upper": ..}`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum PriorEntry {
    Pair(f64, f64),
    Bound(Bound),
}

impl From<PriorEntry> for Bound {
    fn from(entry: PriorEntry) -> Self {
        match entry {
            PriorEntry::Pair(lower, upper) => Bound::new(lower, upper),
            PriorEntry::Bound(b) => b,
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {what} file {}", path.display()))
}

pub fn read_sample(path: &Path) -> anyhow::Result<SampleFile> {
    let sample: SampleFile = read_json(path, "sample")?;
    if sample.pixels().is_empty() {
        bail!("Sample file {} contains no values", path.display());
    }
    Ok(sample)
}

pub fn read_samples(path: &Path) -> anyhow::Result<Vec<Vec<f64>>> {
    let samples: Vec<SampleFile> = read_json(path, "samples")?;
    Ok(samples.into_iter().map(SampleFile::into_pixels).collect())
}

pub fn read_prior(path: &Path) -> anyhow::Result<Vec<Bound>> {
    let entries: Vec<PriorEntry> = read_json(path, "prior")?;
    Ok(entries.into_iter().map(Bound::from).collect())
}

pub fn read_values(path: &Path) -> anyhow::Result<Vec<f64>> {
    read_json(path, "bounds")
}
