//! Binning engine: classifies sample batches into the grid.
//!
//! Each selected cell receives one lane of samples (the innermost axis of the
//! batch). Cells never share memory, so the per-cell loops run as a
//! data-parallel map over cells with rayon when the selection is large enough.

use hg_core::{Error, Result};
use ndarray::{ArrayD, ArrayView1, ArrayViewD, ArrayViewMut1, ArrayViewMutD, Axis, Zip};

use crate::edges::{BinEdges, Placement};
use crate::histogram::Histogram;
use crate::selector::{Selector, resolve};

/// Configuration for [`Histogram::fill_selected`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillConfig {
    /// Allow the rayon cell-parallel path.
    pub parallel: bool,
    /// Minimum number of selected cells before going parallel.
    /// Default: 64.
    pub min_parallel_cells: usize,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self { parallel: true, min_parallel_cells: 64 }
    }
}

impl FillConfig {
    /// Always fill cells sequentially.
    pub fn sequential() -> Self {
        Self { parallel: false, min_parallel_cells: usize::MAX }
    }

    /// Set the parallel threshold.
    pub fn min_parallel_cells(mut self, cells: usize) -> Self {
        self.min_parallel_cells = cells;
        self
    }
}

impl Histogram {
    /// Fill every cell. `samples` has shape `cell_shape + [n_samples]`.
    pub fn fill(&mut self, samples: ArrayViewD<'_, f32>) -> Result<()> {
        self.fill_selected(&[], samples)
    }

    /// Fill a single cell addressed by absolute coordinates.
    pub fn fill_cell(&mut self, cell: &[usize], samples: &[f32]) -> Result<()> {
        let selector: Vec<Selector> = cell.iter().map(|&c| Selector::Index(c as i64)).collect();
        if selector.len() != self.cell_shape().len() {
            return Err(Error::SelectorRank { rank: self.cell_shape().len(), given: cell.len() });
        }
        self.fill_selected(&selector, ArrayView1::from(samples).into_dyn())
    }

    /// Fill the cells picked by `selector`.
    ///
    /// `samples` must have shape `selection + [n_samples]`, where `selection`
    /// is the resolved shape of `selector`. NaN samples are skipped. Counts
    /// accumulate across calls. A batch that would push any counter past
    /// `u32::MAX` fails with [`Error::CountOverflow`] and changes nothing.
    pub fn fill_selected(
        &mut self,
        selector: &[Selector],
        samples: ArrayViewD<'_, f32>,
    ) -> Result<()> {
        let resolved = resolve(selector, self.cell_shape())?;
        if resolved.has_new_axis() {
            return Err(Error::Validation("new-axis selectors cannot be filled".into()));
        }

        let selection = resolved.shape();
        let batch = samples.shape();
        if batch.len() != selection.len() + 1 || batch[..selection.len()] != *selection {
            return Err(Error::ShapeMismatch {
                expected: selection.to_vec(),
                got: batch[..batch.len().saturating_sub(1)].to_vec(),
            });
        }

        let n_cells: usize = selection.iter().product();
        let n_samples = batch[batch.len() - 1];
        let config = self.fill_config;
        let parallel = config.parallel
            && n_cells >= config.min_parallel_cells
            && rayon::current_thread_index().is_none()
            && rayon::current_num_threads() > 1;
        tracing::debug!(cells = n_cells, samples = n_samples, parallel, "fill batch");

        let cells = resolved.slice_elems(0);
        let edges: &BinEdges = &self.bins;
        let mut counts = self.counts.slice_mut(resolved.slice_elems(1).as_slice());
        let mut underflow = self.underflow.slice_mut(cells.as_slice());
        let mut overflow = self.overflow.slice_mut(cells.as_slice());

        // Tally the batch separately so an overflowing batch leaves the grid untouched.
        let mut tally = ArrayD::<u64>::zeros(counts.raw_dim());
        let mut tally_uf = ArrayD::<u64>::zeros(underflow.raw_dim());
        let mut tally_of = ArrayD::<u64>::zeros(overflow.raw_dim());

        let bin_axis = Axis(tally.ndim() - 1);
        let sample_axis = Axis(samples.ndim() - 1);
        let zip = Zip::from(tally.lanes_mut(bin_axis))
            .and(&mut tally_uf)
            .and(&mut tally_of)
            .and(samples.lanes(sample_axis));

        if parallel {
            zip.par_for_each(|bins, uf, of, xs| tally_lane(edges, bins, uf, of, xs));
        } else {
            zip.for_each(|bins, uf, of, xs| tally_lane(edges, bins, uf, of, xs));
        }

        let fits = |current: &ArrayViewMutD<'_, u32>, extra: &ArrayD<u64>| {
            Zip::from(current).and(extra).all(|&c, &t| u64::from(c) + t <= u64::from(u32::MAX))
        };
        if !fits(&counts, &tally) || !fits(&underflow, &tally_uf) || !fits(&overflow, &tally_of)
        {
            return Err(Error::CountOverflow);
        }

        for (current, extra) in
            [(&mut counts, &tally), (&mut underflow, &tally_uf), (&mut overflow, &tally_of)]
        {
            Zip::from(current).and(extra).for_each(|c, &t| *c += t as u32);
        }
        Ok(())
    }
}

/// Count one cell's samples into its tally lane.
#[inline]
fn tally_lane(
    edges: &BinEdges,
    mut counts: ArrayViewMut1<'_, u64>,
    underflow: &mut u64,
    overflow: &mut u64,
    samples: ArrayView1<'_, f32>,
) {
    for &v in samples.iter() {
        match edges.place(v) {
            Placement::Bin(i) => counts[i] += 1,
            Placement::Underflow => *underflow += 1,
            Placement::Overflow => *overflow += 1,
            Placement::Skipped => {}
        }
    }
}
