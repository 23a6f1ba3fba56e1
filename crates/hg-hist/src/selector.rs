//! Per-axis selectors and their resolution against a grid shape.
//!
//! A selector is an ordered list of [`Selector`] components, one per grid
//! axis (plus any number of [`Selector::NewAxis`] markers). Grid axes not
//! addressed by the list are taken whole. Resolution validates every bounded
//! component and produces a canonical per-axis selection together with the
//! logical output shape.

use hg_core::{Error, Result};
use ndarray::SliceInfoElem;
use serde::{Deserialize, Serialize};

/// One component of a multi-axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// A single coordinate. The axis is squeezed out of the output.
    Index(i64),
    /// Half-open `start..stop` with a positive `step`.
    Range {
        /// First coordinate (inclusive).
        start: i64,
        /// End coordinate (exclusive).
        stop: i64,
        /// Stride, at least 1.
        step: usize,
    },
    /// The whole axis.
    Whole,
    /// Insert a broadcast axis of size 1. Consumes no grid axis.
    NewAxis,
}

impl Selector {
    /// `start..stop` with unit step.
    pub fn range(start: i64, stop: i64) -> Self {
        Selector::Range { start, stop, step: 1 }
    }

    fn consumes_axis(&self) -> bool {
        !matches!(self, Selector::NewAxis)
    }
}

/// Canonical, bounds-checked selection for one output position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSelection {
    /// Single coordinate on a grid axis (squeezed).
    Index(usize),
    /// `start..stop` by `step` on a grid axis.
    Range {
        /// First coordinate.
        start: usize,
        /// End coordinate (exclusive).
        stop: usize,
        /// Stride.
        step: usize,
    },
    /// Inserted axis of size 1.
    NewAxis,
}

impl AxisSelection {
    fn to_slice_elem(self) -> SliceInfoElem {
        match self {
            AxisSelection::Index(i) => SliceInfoElem::Index(i as isize),
            AxisSelection::Range { start, stop, step } => SliceInfoElem::Slice {
                start: start as isize,
                end: Some(stop as isize),
                step: step as isize,
            },
            AxisSelection::NewAxis => SliceInfoElem::NewAxis,
        }
    }
}

/// Result of resolving a selector against a grid shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    axes: Vec<AxisSelection>,
    shape: Vec<usize>,
}

impl Resolved {
    /// Canonical selection, one entry per output position (grid axes and inserted axes).
    pub fn axes(&self) -> &[AxisSelection] {
        &self.axes
    }

    /// Logical shape of the selection (indexed axes squeezed, new axes as 1).
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Whether any inserted axis is present.
    pub fn has_new_axis(&self) -> bool {
        self.axes.iter().any(|a| matches!(a, AxisSelection::NewAxis))
    }

    /// Slice arguments for the grid arrays, followed by `trailing` whole axes
    /// (e.g. `1` for the bin axis of `counts`).
    pub fn slice_elems(&self, trailing: usize) -> Vec<SliceInfoElem> {
        let mut elems: Vec<SliceInfoElem> =
            self.axes.iter().map(|a| a.to_slice_elem()).collect();
        elems.extend(std::iter::repeat_n(
            SliceInfoElem::Slice { start: 0, end: None, step: 1 },
            trailing,
        ));
        elems
    }
}

/// Resolve `selector` against a grid of `shape`.
///
/// Fails with [`Error::IndexConstraint`] naming the axis, value and axis size
/// for any out-of-bounds component, and with [`Error::SelectorRank`] when the
/// selector addresses more axes than `shape` has.
pub fn resolve(selector: &[Selector], shape: &[usize]) -> Result<Resolved> {
    let given = selector.iter().filter(|s| s.consumes_axis()).count();
    if given > shape.len() {
        return Err(Error::SelectorRank { rank: shape.len(), given });
    }

    let mut axes = Vec::with_capacity(selector.len() + shape.len() - given);
    let mut out_shape = Vec::with_capacity(axes.capacity());
    let mut axis = 0;

    for component in selector {
        match *component {
            Selector::NewAxis => {
                axes.push(AxisSelection::NewAxis);
                out_shape.push(1);
            }
            Selector::Whole => {
                let size = shape[axis];
                axes.push(AxisSelection::Range { start: 0, stop: size, step: 1 });
                out_shape.push(size);
                axis += 1;
            }
            Selector::Index(value) => {
                let size = shape[axis];
                if value < 0 || value as u64 >= size as u64 {
                    return Err(Error::IndexConstraint { axis, value, size });
                }
                axes.push(AxisSelection::Index(value as usize));
                axis += 1;
            }
            Selector::Range { start, stop, step } => {
                let size = shape[axis];
                if start < 0 || start as u64 > size as u64 {
                    return Err(Error::IndexConstraint { axis, value: start, size });
                }
                if stop as u64 > size as u64 {
                    return Err(Error::IndexConstraint { axis, value: stop, size });
                }
                if step == 0 {
                    return Err(Error::Validation(format!("zero step on axis {axis}")));
                }
                // A reversed range selects nothing.
                let (start, stop) = (start as usize, stop.max(start) as usize);
                axes.push(AxisSelection::Range { start, stop, step });
                out_shape.push((stop - start).div_ceil(step));
                axis += 1;
            }
        }
    }

    for &size in &shape[axis..] {
        axes.push(AxisSelection::Range { start: 0, stop: size, step: 1 });
        out_shape.push(size);
    }

    Ok(Resolved { axes, shape: out_shape })
}
