//! Genome crossover between networks of identical topology.

use super::network::Network;
use ndarray::Array2;
use rand::Rng;

impl Network {
    /// Splice weights from `other` into `self` with one random row cut
    /// and one random column cut per transition matrix.
    ///
    /// For each matrix, every row strictly before the row cut is copied
    /// from `other`, and within the cut row every column strictly before
    /// the column cut is copied. The rest stays. This is a single-point
    /// cut per matrix, not a uniform per-weight mix, so most of each
    /// matrix transfers wholesale.
    pub fn crossover_from<R: Rng + ?Sized>(&mut self, other: &Network, rng: &mut R) {
        assert_eq!(
            self.layer_sizes, other.layer_sizes,
            "crossover requires identical topologies"
        );
        for (w, ow) in self.weights.iter_mut().zip(other.weights.iter()) {
            let (rows, cols) = w.dim();
            let row_cut = rng.gen_range(0..rows);
            let col_cut = rng.gen_range(0..cols);
            splice(w, ow, row_cut, col_cut);
        }
    }
}

/// Copy rows `[0, row_cut)` and cells `[row_cut][0..col_cut)` from `other`.
fn splice(w: &mut Array2<f64>, other: &Array2<f64>, row_cut: usize, col_cut: usize) {
    for r in 0..row_cut {
        w.row_mut(r).assign(&other.row(r));
    }
    for c in 0..col_cut {
        w[[row_cut, c]] = other[[row_cut, c]];
    }
}
