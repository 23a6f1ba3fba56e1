//! Per-cell statistics over binned counts.
//!
//! Every statistic reduces the bin axis of the selected counts and returns an
//! array of shape `selection`. NaN marks "undefined because empty"; it is a
//! value, not an error.

use hg_core::Result;
use ndarray::{ArrayD, ArrayView1, Axis};

use crate::edges::PositionMethod;
use crate::histogram::Histogram;
use crate::selector::Selector;

/// Summary of one cell, as used for legends and reports.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CellSummary {
    /// Sum of bin counts.
    pub counts: u64,
    /// Underflow counter.
    pub underflow: u64,
    /// Overflow counter.
    pub overflow: u64,
    /// Mean (left-edge positions).
    pub mean: f64,
    /// Standard deviation (left-edge positions).
    pub std: f64,
    /// Mode (left edge of the highest bin).
    pub mode: f64,
    /// Left edge of the highest occupied bin.
    pub max: f64,
    /// Left edge of the lowest occupied bin.
    pub min: f64,
}

impl Histogram {
    /// Poisson errors, `sqrt(counts)`, shape `selection + [n_bins]`.
    pub fn errors(&self, selector: &[Selector]) -> Result<ArrayD<f64>> {
        Ok(self.counts_view(selector)?.mapv(|c| f64::from(c).sqrt()))
    }

    /// Count-weighted mean of bin positions.
    pub fn mean(&self, selector: &[Selector], method: PositionMethod) -> Result<ArrayD<f64>> {
        let positions = self.positions(method);
        self.reduce_bins(selector, |lane| moments(lane, &positions).0)
    }

    /// Count-weighted standard deviation of bin positions.
    ///
    /// Small negative variances from cancellation are clamped to zero; empty
    /// cells give NaN.
    pub fn std(&self, selector: &[Selector], method: PositionMethod) -> Result<ArrayD<f64>> {
        let positions = self.positions(method);
        self.reduce_bins(selector, |lane| {
            let (mean, mean_sq) = moments(lane, &positions);
            let var = mean_sq - mean * mean;
            if var.is_nan() { f64::NAN } else { var.max(0.0).sqrt() }
        })
    }

    /// Left edge of the highest-count bin (first one on ties).
    ///
    /// NaN for every selected cell when the whole grid is empty. An empty cell
    /// in a non-empty grid reports the first bin.
    pub fn mode(&self, selector: &[Selector]) -> Result<ArrayD<f64>> {
        let left = self.positions(PositionMethod::Left);
        if self.is_empty() {
            return self.reduce_bins(selector, |_| f64::NAN);
        }
        self.reduce_bins(selector, |lane| {
            let mut best = 0;
            for (i, &c) in lane.iter().enumerate() {
                if c > lane[best] {
                    best = i;
                }
            }
            left[best]
        })
    }

    /// Left edge of the lowest occupied bin; NaN for empty cells.
    pub fn min(&self, selector: &[Selector]) -> Result<ArrayD<f64>> {
        let left = self.positions(PositionMethod::Left);
        self.reduce_bins(selector, |lane| {
            lane.iter().position(|&c| c > 0).map_or(f64::NAN, |i| left[i])
        })
    }

    /// Left edge of the highest occupied bin; NaN for empty cells.
    pub fn max(&self, selector: &[Selector]) -> Result<ArrayD<f64>> {
        let left = self.positions(PositionMethod::Left);
        self.reduce_bins(selector, |lane| {
            lane.iter().rposition(|&c| c > 0).map_or(f64::NAN, |i| left[i])
        })
    }

    /// Counts, flows and statistics of the single cell at `cell`.
    pub fn summary(&self, cell: &[usize]) -> Result<CellSummary> {
        let (underflow, overflow) = self.cell_flows(cell)?;
        let selector: Vec<Selector> = cell.iter().map(|&c| Selector::Index(c as i64)).collect();
        let scalar = |a: ArrayD<f64>| a.iter().next().copied().unwrap_or(f64::NAN);
        Ok(CellSummary {
            counts: self.cell_counts(cell)?.iter().map(|&c| u64::from(c)).sum(),
            underflow: u64::from(underflow),
            overflow: u64::from(overflow),
            mean: scalar(self.mean(&selector, PositionMethod::Left)?),
            std: scalar(self.std(&selector, PositionMethod::Left)?),
            mode: scalar(self.mode(&selector)?),
            max: scalar(self.max(&selector)?),
            min: scalar(self.min(&selector)?),
        })
    }

    fn positions(&self, method: PositionMethod) -> Vec<f64> {
        self.bins.positions(method).iter().map(|&p| f64::from(p)).collect()
    }

    fn reduce_bins<F>(&self, selector: &[Selector], f: F) -> Result<ArrayD<f64>>
    where
        F: FnMut(ArrayView1<'_, u32>) -> f64,
    {
        let view = self.counts_view(selector)?;
        let last = Axis(view.ndim() - 1);
        Ok(view.map_axis(last, f))
    }
}

/// `(E[x], E[x^2])` of bin positions weighted by counts. `0/0` yields NaN.
fn moments(lane: ArrayView1<'_, u32>, positions: &[f64]) -> (f64, f64) {
    let (mut n, mut sx, mut sxx) = (0.0, 0.0, 0.0);
    for (&c, &x) in lane.iter().zip(positions) {
        let c = f64::from(c);
        n += c;
        sx += c * x;
        sxx += c * x * x;
    }
    (sx / n, sxx / n)
}
