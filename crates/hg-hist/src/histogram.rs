//! The histogram grid: one fixed-edge histogram per cell.

use std::sync::Arc;

use hg_core::{Error, Result};
use ndarray::{ArrayD, ArrayView1, ArrayViewD, Axis, Ix1, IxDyn};

use crate::edges::BinEdges;
use crate::fill::FillConfig;
use crate::selector::{Selector, resolve};

/// A grid of independent histograms sharing one [`BinEdges`] table.
///
/// `counts` has shape `cell_shape + [n_bins]`; `underflow` and `overflow`
/// have shape `cell_shape`. All three are owned exclusively; selections
/// return independent copies.
#[derive(Debug, Clone)]
pub struct Histogram {
    pub(crate) bins: Arc<BinEdges>,
    pub(crate) counts: ArrayD<u32>,
    pub(crate) underflow: ArrayD<u32>,
    pub(crate) overflow: ArrayD<u32>,
    pub(crate) fill_config: FillConfig,
}

impl Histogram {
    /// Create an empty (all-zero) grid of `cell_shape` cells.
    pub fn new(bins: impl Into<Arc<BinEdges>>, cell_shape: &[usize]) -> Self {
        let bins = bins.into();
        let mut shape = cell_shape.to_vec();
        shape.push(bins.n_bins());
        Self {
            counts: ArrayD::zeros(IxDyn(&shape)),
            underflow: ArrayD::zeros(IxDyn(cell_shape)),
            overflow: ArrayD::zeros(IxDyn(cell_shape)),
            bins,
            fill_config: FillConfig::default(),
        }
    }

    /// Assemble a histogram from existing arrays, checking every shape invariant.
    pub fn from_parts(
        bins: impl Into<Arc<BinEdges>>,
        counts: ArrayD<u32>,
        underflow: ArrayD<u32>,
        overflow: ArrayD<u32>,
    ) -> Result<Self> {
        let bins = bins.into();
        let Some((&n_bins, cell_shape)) = counts.shape().split_last() else {
            return Err(Error::Validation("counts must have at least the bin axis".into()));
        };
        if n_bins != bins.n_bins() {
            let mut expected = cell_shape.to_vec();
            expected.push(bins.n_bins());
            return Err(Error::ShapeMismatch { expected, got: counts.shape().to_vec() });
        }
        for flow in [&underflow, &overflow] {
            if flow.shape() != cell_shape {
                return Err(Error::ShapeMismatch {
                    expected: cell_shape.to_vec(),
                    got: flow.shape().to_vec(),
                });
            }
        }
        Ok(Self { bins, counts, underflow, overflow, fill_config: FillConfig::default() })
    }

    /// Assemble a histogram from row-major flat buffers.
    pub fn from_flat(
        bins: impl Into<Arc<BinEdges>>,
        cell_shape: &[usize],
        counts: Vec<u32>,
        underflow: Vec<u32>,
        overflow: Vec<u32>,
    ) -> Result<Self> {
        let bins = bins.into();
        let mut shape = cell_shape.to_vec();
        shape.push(bins.n_bins());
        let counts = shaped(&shape, counts)?;
        let underflow = shaped(cell_shape, underflow)?;
        let overflow = shaped(cell_shape, overflow)?;
        Self::from_parts(bins, counts, underflow, overflow)
    }

    /// Replace the fill configuration.
    pub fn with_fill_config(mut self, config: FillConfig) -> Self {
        self.fill_config = config;
        self
    }

    /// Current fill configuration.
    pub fn fill_config(&self) -> &FillConfig {
        &self.fill_config
    }

    /// Bin edge table.
    pub fn bins(&self) -> &BinEdges {
        &self.bins
    }

    /// Shared handle to the bin edge table.
    pub fn bins_arc(&self) -> Arc<BinEdges> {
        Arc::clone(&self.bins)
    }

    /// Number of bins per cell.
    pub fn n_bins(&self) -> usize {
        self.bins.n_bins()
    }

    /// Logical shape of the cell grid.
    pub fn cell_shape(&self) -> &[usize] {
        let shape = self.counts.shape();
        &shape[..shape.len() - 1]
    }

    /// Full shape of `counts` (`cell_shape + [n_bins]`).
    pub fn shape(&self) -> &[usize] {
        self.counts.shape()
    }

    /// Number of cells in the grid.
    pub fn n_cells(&self) -> usize {
        self.underflow.len()
    }

    /// Bin counts, shape `cell_shape + [n_bins]`.
    pub fn counts(&self) -> &ArrayD<u32> {
        &self.counts
    }

    /// Underflow counters, shape `cell_shape`.
    pub fn underflow(&self) -> &ArrayD<u32> {
        &self.underflow
    }

    /// Overflow counters, shape `cell_shape`.
    pub fn overflow(&self) -> &ArrayD<u32> {
        &self.overflow
    }

    /// Bin counts of the cell at absolute coordinates `cell`.
    pub fn cell_counts(&self, cell: &[usize]) -> Result<ArrayView1<'_, u32>> {
        self.check_cell(cell)?;
        let mut view = self.counts.view();
        for &c in cell {
            view = view.index_axis_move(Axis(0), c);
        }
        view.into_dimensionality::<Ix1>()
            .map_err(|e| Error::Validation(format!("cell view: {e}")))
    }

    /// `(underflow, overflow)` of the cell at absolute coordinates `cell`.
    pub fn cell_flows(&self, cell: &[usize]) -> Result<(u32, u32)> {
        self.check_cell(cell)?;
        Ok((self.underflow[cell], self.overflow[cell]))
    }

    /// Sum of all bin counts over the whole grid (under/overflow excluded).
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    /// Per-cell sum of bin counts, shape `cell_shape`.
    pub fn entries(&self) -> ArrayD<u64> {
        let last = Axis(self.counts.ndim() - 1);
        self.counts.map_axis(last, |lane| lane.iter().map(|&c| u64::from(c)).sum())
    }

    /// `true` when no sample has landed in any bin of any cell.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Independent copy of the cells picked by `selector`.
    ///
    /// Indexed axes are squeezed; [`Selector::NewAxis`] inserts a size-1 axis.
    pub fn select(&self, selector: &[Selector]) -> Result<Histogram> {
        let resolved = resolve(selector, self.cell_shape())?;
        let counts = self.counts.slice(resolved.slice_elems(1).as_slice()).to_owned();
        let cells = resolved.slice_elems(0);
        let underflow = self.underflow.slice(cells.as_slice()).to_owned();
        let overflow = self.overflow.slice(cells.as_slice()).to_owned();
        Ok(Histogram {
            bins: Arc::clone(&self.bins),
            counts,
            underflow,
            overflow,
            fill_config: self.fill_config,
        })
    }

    /// Read-only view of the counts picked by `selector` (`selection + [n_bins]`).
    pub(crate) fn counts_view(&self, selector: &[Selector]) -> Result<ArrayViewD<'_, u32>> {
        let resolved = resolve(selector, self.cell_shape())?;
        Ok(self.counts.slice(resolved.slice_elems(1).as_slice()))
    }

    /// Zero counts, underflow and overflow.
    pub fn reset(&mut self) {
        self.counts.fill(0);
        self.underflow.fill(0);
        self.overflow.fill(0);
    }

    fn check_cell(&self, cell: &[usize]) -> Result<()> {
        let shape = self.cell_shape();
        if cell.len() != shape.len() {
            return Err(Error::SelectorRank { rank: shape.len(), given: cell.len() });
        }
        for (axis, (&c, &size)) in cell.iter().zip(shape).enumerate() {
            if c >= size {
                return Err(Error::IndexConstraint { axis, value: c as i64, size });
            }
        }
        Ok(())
    }
}

fn shaped(shape: &[usize], data: Vec<u32>) -> Result<ArrayD<u32>> {
    let len = data.len();
    ArrayD::from_shape_vec(IxDyn(shape), data)
        .map_err(|_| Error::ShapeMismatch { expected: shape.to_vec(), got: vec![len] })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges() -> BinEdges {
        BinEdges::new([0.0, 1.0, 2.0, 3.0]).unwrap()
    }

    #[test]
    fn test_new_is_empty() {
        let h = Histogram::new(edges(), &[2, 5]);
        assert_eq!(h.shape(), &[2, 5, 3]);
        assert_eq!(h.cell_shape(), &[2, 5]);
        assert_eq!(h.underflow().shape(), &[2, 5]);
        assert_eq!(h.n_cells(), 10);
        assert!(h.is_empty());
        assert_eq!(h.total(), 0);
    }

    #[test]
    fn test_scalar_grid() {
        let h = Histogram::new(edges(), &[]);
        assert_eq!(h.shape(), &[3]);
        assert_eq!(h.cell_shape(), &[] as &[usize]);
        assert_eq!(h.n_cells(), 1);
        assert_eq!(h.cell_counts(&[]).unwrap().len(), 3);
    }

    #[test]
    fn test_from_parts_checks_shapes() {
        let counts = ArrayD::zeros(IxDyn(&[2, 3]));
        let ok = Histogram::from_parts(
            edges(),
            counts.clone(),
            ArrayD::zeros(IxDyn(&[2])),
            ArrayD::zeros(IxDyn(&[2])),
        );
        assert!(ok.is_ok());

        let bad_flow = Histogram::from_parts(
            edges(),
            counts,
            ArrayD::zeros(IxDyn(&[3])),
            ArrayD::zeros(IxDyn(&[2])),
        );
        assert!(matches!(bad_flow, Err(Error::ShapeMismatch { .. })));

        let bad_bins = Histogram::from_parts(
            edges(),
            ArrayD::zeros(IxDyn(&[2, 4])),
            ArrayD::zeros(IxDyn(&[2])),
            ArrayD::zeros(IxDyn(&[2])),
        );
        assert!(bad_bins.is_err());
    }

    #[test]
    fn test_from_flat_length_mismatch() {
        let r = Histogram::from_flat(edges(), &[2], vec![0; 5], vec![0; 2], vec![0; 2]);
        assert!(r.unwrap_err().is_index_constraint());
    }

    #[test]
    fn test_select_copies() {
        let counts = ArrayD::from_shape_vec(IxDyn(&[2, 3]), vec![1, 2, 3, 4, 5, 6]).unwrap();
        let uf = ArrayD::from_shape_vec(IxDyn(&[2]), vec![7, 8]).unwrap();
        let of = ArrayD::from_shape_vec(IxDyn(&[2]), vec![9, 10]).unwrap();
        let mut h = Histogram::from_parts(edges(), counts, uf, of).unwrap();

        let sub = h.select(&[Selector::Index(1)]).unwrap();
        assert_eq!(sub.cell_shape(), &[] as &[usize]);
        assert_eq!(sub.counts().as_slice().unwrap(), &[4, 5, 6]);
        assert_eq!(sub.underflow().sum(), 8);
        assert_eq!(sub.overflow().sum(), 10);

        h.reset();
        assert_eq!(sub.counts().sum(), 15);
        assert!(h.is_empty());
    }

    #[test]
    fn test_select_new_axis() {
        let h = Histogram::new(edges(), &[4]);
        let sub = h.select(&[Selector::NewAxis, Selector::range(1, 3)]).unwrap();
        assert_eq!(sub.shape(), &[1, 2, 3]);
        assert_eq!(sub.underflow().shape(), &[1, 2]);
    }

    #[test]
    fn test_select_reversed_range_is_empty() {
        let mut h = Histogram::new(edges(), &[3]);
        h.fill_cell(&[2], &[0.5]).unwrap();
        let sub = h.select(&[Selector::range(2, 1)]).unwrap();
        assert_eq!(sub.shape(), &[0, 3]);
        assert_eq!(sub.total(), 0);
    }

    #[test]
    fn test_cell_access_bounds() {
        let h = Histogram::new(edges(), &[2, 2]);
        assert!(h.cell_flows(&[1, 1]).is_ok());
        let err = h.cell_flows(&[0, 2]).unwrap_err();
        assert!(matches!(err, Error::IndexConstraint { axis: 1, value: 2, size: 2 }));
        assert!(h.cell_counts(&[0]).is_err());
    }
}
