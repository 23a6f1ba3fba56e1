//! Step-histogram artifacts (counts with Poisson error bars).

use hg_core::Result;
use hg_hist::{CellSummary, Histogram};
use ndarray::{Dimension, IxDyn};
use serde::Serialize;

/// Schema tag written into every artifact.
pub const SCHEMA_VERSION: &str = "histgrid_plot_v1";

/// Options for [`cell_artifact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotOptions {
    /// Include Poisson error bars (otherwise all errors are 0).
    pub errors: bool,
    /// Divide counts and errors by the cell total.
    pub normed: bool,
    /// Series label; defaults to the cell coordinates.
    pub label: Option<String>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self { errors: true, normed: false, label: None }
    }
}

/// One cell, ready to plot as a step histogram. Zero-count bins are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct HistogramPlotArtifact {
    /// Artifact schema tag.
    pub schema_version: String,
    /// Series label.
    pub label: String,
    /// Cell coordinates in the grid.
    pub cell: Vec<usize>,
    /// Full bin edge table.
    pub bin_edges: Vec<f64>,
    /// Centers of the occupied bins.
    pub x: Vec<f64>,
    /// Counts (or probabilities when `normed`).
    pub y: Vec<f64>,
    /// Symmetric error per point.
    pub yerr: Vec<f64>,
    /// `"count"` or `"probability"`.
    pub y_label: String,
    /// Counts, flows and statistics of the cell.
    pub summary: CellSummary,
    /// Legend text block.
    pub info_text: String,
}

/// Build the artifact for the cell at `cell`.
pub fn cell_artifact(
    hist: &Histogram,
    cell: &[usize],
    options: &PlotOptions,
) -> Result<HistogramPlotArtifact> {
    let counts = hist.cell_counts(cell)?;
    let summary = hist.summary(cell)?;
    let centers = hist.bins().centers();

    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut yerr = Vec::new();
    for (&c, &center) in counts.iter().zip(centers) {
        if c == 0 {
            continue;
        }
        let c = f64::from(c);
        x.push(f64::from(center));
        y.push(c);
        yerr.push(if options.errors { c.sqrt() } else { 0.0 });
    }

    if options.normed {
        let total: f64 = y.iter().sum();
        if total > 0.0 {
            y.iter_mut().for_each(|v| *v /= total);
            yerr.iter_mut().for_each(|v| *v /= total);
        }
    }

    Ok(HistogramPlotArtifact {
        schema_version: SCHEMA_VERSION.to_string(),
        label: options.label.clone().unwrap_or_else(|| format!("{cell:?}")),
        cell: cell.to_vec(),
        bin_edges: hist.bins().edges().iter().map(|&e| f64::from(e)).collect(),
        x,
        y,
        yerr,
        y_label: if options.normed { "probability" } else { "count" }.to_string(),
        info_text: info_text(&summary),
        summary,
    })
}

/// Artifacts for every cell in row-major order. `options.label` is ignored.
pub fn grid_artifacts(
    hist: &Histogram,
    options: &PlotOptions,
) -> Result<Vec<HistogramPlotArtifact>> {
    let per_cell = PlotOptions { label: None, ..options.clone() };
    ndarray::indices(IxDyn(hist.cell_shape()))
        .into_iter()
        .map(|ix| cell_artifact(hist, ix.slice(), &per_cell))
        .collect()
}

/// Legend text for a cell summary.
pub fn info_text(s: &CellSummary) -> String {
    format!(
        " counts : {}\n underflow : {}\n overflow : {}\n mean : {:.4}\n std : {:.4}\n mode : {:.1}\n max : {:.2}\n min : {:.2}",
        s.counts, s.underflow, s.overflow, s.mean, s.std, s.mode, s.max, s.min
    )
}
