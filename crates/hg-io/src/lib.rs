//! # hg-io
//!
//! Persistence for HistGrid histograms.
//!
//! A histogram is stored as one record holding the bin edges, the cell shape
//! and the row-major `counts` / `underflow` / `overflow` buffers. The format
//! is chosen from the file extension:
//!
//! - `.json`: plain JSON
//! - `.json.gz`: gzip-compressed JSON
//!
//! Loading rebuilds the histogram through [`Histogram::from_flat`], so every
//! shape invariant is checked before a value is returned.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod format;
pub mod record;

pub use format::{Format, SaveOptions, load, load_selected, read_from, save, save_with, write_to};
pub use record::{FORMAT_VERSION, HistogramRecord};
