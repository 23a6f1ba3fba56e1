//! # hg-viz
//!
//! Plot-friendly artifacts for HistGrid histograms.
//!
//! This crate does not draw. It emits numbers-first, serde-serializable
//! structures (bin centers, counts, errors, summary statistics and a legend
//! text) that a renderer can plot directly. Empty-cell statistics are NaN,
//! which serializes to `null` in JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Per-cell plot artifacts.
pub mod histogram;

pub use histogram::{
    HistogramPlotArtifact, PlotOptions, SCHEMA_VERSION, cell_artifact, grid_artifacts, info_text,
};
