//! # hg-hist
//!
//! Grids of fixed-edge frequency histograms over `f32` sample streams.
//!
//! A [`Histogram`] holds one histogram per cell of an N-dimensional grid, all
//! sharing one sorted [`BinEdges`] table. Samples are filled per cell (in
//! parallel across cells for large grids), sub-grids are carved out with
//! [`Selector`]s, and per-cell statistics and algebra operate on the counts.
//!
//! ## Example
//!
//! ```
//! use hg_hist::{BinEdges, Histogram, PositionMethod, Selector};
//! use ndarray::Array2;
//!
//! let edges = BinEdges::new([0.0, 1.0, 2.0, 3.0]).unwrap();
//! let mut h = Histogram::new(edges, &[4]);
//! let samples = Array2::from_elem((4, 10), 1.5_f32);
//! h.fill(samples.view().into_dyn()).unwrap();
//!
//! let cell = h.select(&[Selector::Index(2)]).unwrap();
//! let mean = cell.mean(&[], PositionMethod::Mid).unwrap();
//! assert!((mean[[]] - 1.5).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algebra;
pub mod edges;
pub mod fill;
pub mod histogram;
pub mod selector;
pub mod stats;

pub use edges::{BinEdges, Placement, PositionMethod};
pub use fill::FillConfig;
pub use histogram::Histogram;
pub use selector::{AxisSelection, Resolved, Selector, resolve};
pub use stats::CellSummary;
