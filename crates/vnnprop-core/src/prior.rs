//! Prior per-dimension regions.
//!
//! A prior region is whatever admissible box was established before the
//! current sample was considered: bounds from a previous verification run,
//! or the input region of a property being merged into this one. Where it
//! comes from is not this crate's concern; it only needs one interval per
//! input dimension.

use crate::Bound;

/// A table of per-dimension prior intervals.
pub trait PriorBounds {
    /// Number of dimensions covered by the table.
    fn dims(&self) -> usize;

    /// Prior interval for `dim`, or `None` past the end of the table.
    fn prior(&self, dim: usize) -> Option<Bound>;
}

impl PriorBounds for [Bound] {
    fn dims(&self) -> usize {
        self.len()
    }

    fn prior(&self, dim: usize) -> Option<Bound> {
        self.get(dim).copied()
    }
}

impl PriorBounds for [(f64, f64)] {
    fn dims(&self) -> usize {
        self.len()
    }

    fn prior(&self, dim: usize) -> Option<Bound> {
        self.get(dim).map(|&pair| Bound::from(pair))
    }
}

impl<T> PriorBounds for Vec<T>
where
    [T]: PriorBounds,
{
    fn dims(&self) -> usize {
        self.as_slice().dims()
    }

    fn prior(&self, dim: usize) -> Option<Bound> {
        self.as_slice().prior(dim)
    }
}
