//! Serializable snapshot of a histogram.

use hg_core::{Error, Result};
use hg_hist::{BinEdges, Histogram};
use serde::{Deserialize, Serialize};

/// Version tag written into every record.
pub const FORMAT_VERSION: u32 = 1;

/// Raw arrays of a histogram, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramRecord {
    /// Record layout version.
    pub format_version: u32,
    /// Bin edges (`n_bins + 1`, ascending).
    pub edges: Vec<f32>,
    /// Logical cell grid shape.
    pub cell_shape: Vec<usize>,
    /// Bin counts, `cell_shape + [n_bins]`.
    pub counts: Vec<u32>,
    /// Underflow counters, `cell_shape`.
    pub underflow: Vec<u32>,
    /// Overflow counters, `cell_shape`.
    pub overflow: Vec<u32>,
}

impl From<&Histogram> for HistogramRecord {
    fn from(h: &Histogram) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            edges: h.bins().edges().to_vec(),
            cell_shape: h.cell_shape().to_vec(),
            counts: h.counts().iter().copied().collect(),
            underflow: h.underflow().iter().copied().collect(),
            overflow: h.overflow().iter().copied().collect(),
        }
    }
}

impl HistogramRecord {
    /// Rebuild the histogram, validating the version and all shapes.
    pub fn into_histogram(self) -> Result<Histogram> {
        if self.format_version != FORMAT_VERSION {
            return Err(Error::UnsupportedFormat(format!(
                "record version {} (expected {})",
                self.format_version, FORMAT_VERSION
            )));
        }
        let bins = BinEdges::new(self.edges.iter().copied())?;
        if bins.edges() != self.edges.as_slice() {
            return Err(Error::Validation("stored bin edges are not strictly ascending".into()));
        }
        Histogram::from_flat(bins, &self.cell_shape, self.counts, self.underflow, self.overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_roundtrip() {
        let mut h = Histogram::new(BinEdges::new([0.0, 1.0, 2.0]).unwrap(), &[2, 2]);
        h.fill_cell(&[1, 0], &[0.5, 1.5, 7.0, -3.0]).unwrap();
        let rec = HistogramRecord::from(&h);
        assert_eq!(rec.counts.len(), 8);
        assert_eq!(rec.underflow, vec![0, 0, 1, 0]);
        let back = rec.into_histogram().unwrap();
        assert!(back.equals(&h).unwrap());
    }

    #[test]
    fn test_rejects_truncated_counts() {
        let rec = HistogramRecord {
            format_version: FORMAT_VERSION,
            edges: vec![0.0, 1.0, 2.0],
            cell_shape: vec![3],
            counts: vec![0; 5],
            underflow: vec![0; 3],
            overflow: vec![0; 3],
        };
        assert!(rec.into_histogram().unwrap_err().is_index_constraint());
    }

    #[test]
    fn test_rejects_unsorted_or_future_records() {
        let mut rec = HistogramRecord {
            format_version: FORMAT_VERSION,
            edges: vec![1.0, 0.0],
            cell_shape: vec![],
            counts: vec![0],
            underflow: vec![0],
            overflow: vec![0],
        };
        assert!(matches!(rec.clone().into_histogram(), Err(Error::Validation(_))));
        rec.edges = vec![0.0, 1.0];
        rec.format_version = 99;
        assert!(matches!(rec.into_histogram(), Err(Error::UnsupportedFormat(_))));
    }
}
