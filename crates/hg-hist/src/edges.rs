//! Immutable table of bin edges.
//!
//! Edges are narrowed to `f32` and sorted at construction. Bin `i` is the
//! half-open interval `[edges[i], edges[i + 1])`; values below the first edge
//! are underflow and values at or above the last edge are overflow.

use hg_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Where a single sample lands relative to a [`BinEdges`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// `v < edges[0]`.
    Underflow,
    /// `v >= edges[n_bins]`.
    Overflow,
    /// In-range bin index.
    Bin(usize),
    /// NaN: neither counted nor flagged.
    Skipped,
}

/// Which representative position of a bin a statistic uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionMethod {
    /// Left edge of the bin.
    #[default]
    Left,
    /// Right edge of the bin.
    Right,
    /// Bin center.
    Mid,
}

impl std::str::FromStr for PositionMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "mid" => Ok(Self::Mid),
            other => Err(Error::UnsupportedMethod(other.to_string())),
        }
    }
}

/// Sorted `f32` bin edges (length `n_bins + 1`) plus derived bin centers.
#[derive(Debug, Clone)]
pub struct BinEdges {
    edges: Vec<f32>,
    centers: Vec<f32>,
}

impl BinEdges {
    /// Build a table from at least two distinct, non-NaN values in any order.
    pub fn new<I, T>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<f64>,
    {
        let mut edges: Vec<f32> =
            values.into_iter().map(|v| Into::<f64>::into(v) as f32).collect();
        if edges.iter().any(|e| e.is_nan()) {
            return Err(Error::Validation("bin edges must not contain NaN".into()));
        }
        edges.sort_by(f32::total_cmp);
        if edges.len() < 2 {
            return Err(Error::Validation(format!(
                "need at least 2 bin edges, got {}",
                edges.len()
            )));
        }
        if let Some(w) = edges.windows(2).find(|w| w[0] >= w[1]) {
            return Err(Error::Validation(format!("duplicate bin edge {}", w[0])));
        }

        let centers = edges.windows(2).map(|w| w[0] + (w[1] - w[0]) / 2.0).collect();
        Ok(Self { edges, centers })
    }

    /// `n_bins` equal-width bins spanning `[lo, hi)`.
    pub fn uniform(lo: f64, hi: f64, n_bins: usize) -> Result<Self> {
        if n_bins == 0 || lo.is_nan() || hi.is_nan() || lo >= hi {
            return Err(Error::Validation(format!(
                "uniform binning needs lo < hi and n_bins > 0 (lo={lo}, hi={hi}, n_bins={n_bins})"
            )));
        }
        let width = (hi - lo) / n_bins as f64;
        Self::new((0..=n_bins).map(|i| if i == n_bins { hi } else { lo + width * i as f64 }))
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// All `n_bins + 1` edges.
    pub fn edges(&self) -> &[f32] {
        &self.edges
    }

    /// Bin centers, `edges[i] + (edges[i+1] - edges[i]) / 2`.
    pub fn centers(&self) -> &[f32] {
        &self.centers
    }

    /// Left edges of every bin.
    pub fn left(&self) -> &[f32] {
        &self.edges[..self.n_bins()]
    }

    /// Right edges of every bin.
    pub fn right(&self) -> &[f32] {
        &self.edges[1..]
    }

    /// Representative position of every bin for `method`.
    pub fn positions(&self, method: PositionMethod) -> &[f32] {
        match method {
            PositionMethod::Left => self.left(),
            PositionMethod::Right => self.right(),
            PositionMethod::Mid => self.centers(),
        }
    }

    /// Classify one sample. Binary search over the edges, `O(log n_bins)`.
    #[inline]
    pub fn place(&self, v: f32) -> Placement {
        if v.is_nan() {
            return Placement::Skipped;
        }
        if v < self.edges[0] {
            return Placement::Underflow;
        }
        if v >= self.edges[self.edges.len() - 1] {
            return Placement::Overflow;
        }
        // Largest i with edges[i] <= v; i >= 1 because edges[0] <= v.
        Placement::Bin(self.edges.partition_point(|&e| e <= v) - 1)
    }
}

impl PartialEq for BinEdges {
    fn eq(&self, other: &Self) -> bool {
        self.edges.len() == other.edges.len()
            && self.edges.iter().zip(&other.edges).all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for BinEdges {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_at_construction() {
        let b = BinEdges::new([3.0, 0.0, 1.0, 2.0]).unwrap();
        assert_eq!(b.edges(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(b.n_bins(), 3);
        assert_eq!(b.centers(), &[0.5, 1.5, 2.5]);
    }

    #[test]
    fn test_rejects_degenerate_input() {
        assert!(BinEdges::new([1.0]).is_err());
        assert!(BinEdges::new([1.0, 1.0]).is_err());
        assert!(BinEdges::new([0.0, f64::NAN, 1.0]).is_err());
        assert!(BinEdges::uniform(1.0, 0.0, 4).is_err());
    }

    #[test]
    fn test_place_boundaries() {
        let b = BinEdges::new([0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(b.place(-0.5), Placement::Underflow);
        assert_eq!(b.place(0.0), Placement::Bin(0));
        assert_eq!(b.place(1.0), Placement::Bin(1));
        assert_eq!(b.place(2.99), Placement::Bin(2));
        assert_eq!(b.place(3.0), Placement::Overflow);
        assert_eq!(b.place(f32::NAN), Placement::Skipped);
        assert_eq!(b.place(f32::NEG_INFINITY), Placement::Underflow);
        assert_eq!(b.place(f32::INFINITY), Placement::Overflow);
    }

    #[test]
    fn test_equality_after_narrowing() {
        let a = BinEdges::new([0.0_f64, 0.1, 0.2]).unwrap();
        let b = BinEdges::new([0.0_f32, 0.1, 0.2]).unwrap();
        assert_eq!(a, b);
        let c = BinEdges::new([0.0, 0.1, 0.25]).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_uniform_last_edge_exact() {
        let b = BinEdges::uniform(0.0, 1.0, 10).unwrap();
        assert_eq!(b.n_bins(), 10);
        assert_eq!(b.edges()[10], 1.0);
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("mid".parse::<PositionMethod>().unwrap(), PositionMethod::Mid);
        let err = "median".parse::<PositionMethod>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedMethod(ref m) if m == "median"));
    }
}
