//! Equality, addition and axis reduction of histograms.

use std::sync::Arc;

use hg_core::{Error, Result};
use ndarray::{ArrayD, Axis, Zip};

use crate::histogram::Histogram;

impl Histogram {
    /// Fail with [`Error::IncompatibleHistogram`] unless `self` and `other`
    /// have the same shape and bit-identical bin edges.
    pub fn check_compatible(&self, other: &Histogram) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(Error::IncompatibleHistogram(format!(
                "cannot join histograms of shape {:?} and {:?}",
                self.shape(),
                other.shape()
            )));
        }
        if self.bins != other.bins {
            return Err(Error::IncompatibleHistogram("bin edges differ".into()));
        }
        Ok(())
    }

    /// Element-wise equality of counts, underflow and overflow.
    ///
    /// Structurally incomparable histograms are an error, not `false`.
    pub fn equals(&self, other: &Histogram) -> Result<bool> {
        self.check_compatible(other)?;
        Ok(self.counts == other.counts
            && self.underflow == other.underflow
            && self.overflow == other.overflow)
    }

    /// New histogram holding the element-wise sum of `self` and `other`.
    pub fn add(&self, other: &Histogram) -> Result<Histogram> {
        let mut out = self.clone();
        out.accumulate(other)?;
        Ok(out)
    }

    /// Add `other` into `self` in place.
    ///
    /// Fails without modifying `self` if any count would exceed `u32::MAX`.
    pub fn accumulate(&mut self, other: &Histogram) -> Result<()> {
        self.check_compatible(other)?;
        let fits = |a: &ArrayD<u32>, b: &ArrayD<u32>| {
            Zip::from(a).and(b).all(|&x, &y| x.checked_add(y).is_some())
        };
        if !fits(&self.counts, &other.counts)
            || !fits(&self.underflow, &other.underflow)
            || !fits(&self.overflow, &other.overflow)
        {
            return Err(Error::CountOverflow);
        }
        self.counts += &other.counts;
        self.underflow += &other.underflow;
        self.overflow += &other.overflow;
        Ok(())
    }

    /// Sum counts, underflow and overflow along grid `axis`, merging those
    /// cells into one. The bin axis cannot be combined.
    pub fn combine(&self, axis: usize) -> Result<Histogram> {
        let rank = self.cell_shape().len();
        if axis >= rank {
            return Err(Error::Validation(format!(
                "cannot combine along axis {axis} of a rank-{rank} cell grid"
            )));
        }
        tracing::debug!(axis, rank, cells = self.n_cells(), "combine");
        Ok(Histogram {
            bins: Arc::clone(&self.bins),
            counts: sum_axis_checked(&self.counts, Axis(axis))?,
            underflow: sum_axis_checked(&self.underflow, Axis(axis))?,
            overflow: sum_axis_checked(&self.overflow, Axis(axis))?,
            fill_config: self.fill_config,
        })
    }
}

fn sum_axis_checked(a: &ArrayD<u32>, axis: Axis) -> Result<ArrayD<u32>> {
    let wide = a.mapv(u64::from).sum_axis(axis);
    if wide.iter().any(|&v| v > u64::from(u32::MAX)) {
        return Err(Error::CountOverflow);
    }
    Ok(wide.mapv(|v| v as u32))
}
