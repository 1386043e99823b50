// ============================================================
// Layer 5 — Sparse Feature Vector
// ============================================================
// A tweet touches a handful of the 5000 vocabulary terms, so term
// counts and TF-IDF weights are stored as (index, value) pairs.
//
// Invariant: `indices` is strictly increasing and every index is
// below `size`. `values` has the same length as `indices`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub size:    usize,
    pub indices: Vec<usize>,
    pub values:  Vec<f32>,
}

impl SparseVector {
    /// An all-zero vector of the given dimension
    pub fn empty(size: usize) -> Self {
        Self { size, indices: Vec::new(), values: Vec::new() }
    }

    /// Build from (index, value) pairs in any order.
    /// Duplicate indices are summed.
    pub fn from_pairs(size: usize, mut pairs: Vec<(usize, f32)>) -> Self {
        pairs.sort_unstable_by_key(|&(i, _)| i);

        let mut indices: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut values:  Vec<f32>   = Vec::with_capacity(pairs.len());
        for (i, v) in pairs {
            debug_assert!(i < size, "index {i} out of bounds for size {size}");
            if indices.last() == Some(&i) {
                if let Some(last) = values.last_mut() {
                    *last += v;
                }
            } else {
                indices.push(i);
                values.push(v);
            }
        }
        Self { size, indices, values }
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product with a dense row of length `size`
    pub fn dot(&self, dense: &[f32]) -> f32 {
        self.iter().map(|(i, v)| v * dense[i]).sum()
    }

    /// Write this vector into a zeroed dense slice of length `size`
    pub fn scatter_into(&self, dense: &mut [f32]) {
        for (i, v) in self.iter() {
            dense[i] = v;
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_sorts_and_merges() {
        let v = SparseVector::from_pairs(5, vec![(3, 1.0), (0, 2.0), (3, 1.0)]);
        assert_eq!(v.indices, vec![0, 3]);
        assert_eq!(v.values,  vec![2.0, 2.0]);
        assert_eq!(v.nnz(), 2);
    }

    #[test]
    fn test_dot_and_scatter() {
        let v = SparseVector::from_pairs(4, vec![(1, 2.0), (3, 0.5)]);
        assert_eq!(v.dot(&[1.0, 1.0, 1.0, 4.0]), 4.0);

        let mut dense = vec![0.0; 4];
        v.scatter_into(&mut dense);
        assert_eq!(dense, vec![0.0, 2.0, 0.0, 0.5]);
    }
}
