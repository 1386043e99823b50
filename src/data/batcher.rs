// ============================================================
// Layer 4 — Feature Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<FeatureSample>
// into dense tensors for one optimiser step.
//
// How batching works here:
//   Input:  N samples, each a sparse vector of dimension d
//   Output: FeatureBatch with features [N, d] and targets [N]
//
//   Every sample is scattered into its own zeroed row of one flat
//   buffer, multiplied column-wise by `scale`, then reshaped:
//   [s1_f1, ..., s1_fd, s2_f1, ..., sN_fd] → [N, d]
//
// `scale` is the per-column 1 / std computed over the training
// rows. A scale of 0 silences a column entirely.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};
use std::sync::Arc;

use crate::data::dataset::FeatureSample;

// ─── FeatureBatch ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct FeatureBatch<B: Backend> {
    /// Scaled dense features, shape [batch_size, num_features]
    pub features: Tensor<B, 2>,

    /// Encoded labels, shape [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── FeatureBatcher ───────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct FeatureBatcher {
    scale: Arc<Vec<f32>>,
}

impl FeatureBatcher {
    pub fn new(scale: Vec<f32>) -> Self {
        Self { scale: Arc::new(scale) }
    }

    pub fn num_features(&self) -> usize {
        self.scale.len()
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
impl<B: Backend> Batcher<B, FeatureSample, FeatureBatch<B>> for FeatureBatcher {
    fn batch(&self, items: Vec<FeatureSample>, device: &B::Device) -> FeatureBatch<B> {
        let batch_size = items.len();
        let d          = self.scale.len();

        // ── Densify ───────────────────────────────────────────────────────────
        let mut flat = vec![0.0f32; batch_size * d];
        for (row, sample) in flat.chunks_mut(d.max(1)).zip(&items) {
            sample.features.scatter_into(row);
            for (x, s) in row.iter_mut().zip(self.scale.iter()) {
                *x *= s;
            }
        }

        let targets: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        // ── Create tensors ────────────────────────────────────────────────────
        let features = Tensor::<B, 1>::from_floats(flat.as_slice(), device)
            .reshape([batch_size, d]);
        let targets = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), device);

        FeatureBatch { features, targets }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::sparse::SparseVector;

    type B = burn::backend::NdArray;

    #[test]
    fn test_batch_densifies_and_scales() {
        let device  = Default::default();
        let batcher = FeatureBatcher::new(vec![2.0, 0.0, 1.0]);
        let items = vec![
            FeatureSample { features: SparseVector::from_pairs(3, vec![(0, 1.0), (1, 5.0)]), label: 1 },
            FeatureSample { features: SparseVector::from_pairs(3, vec![(2, 3.0)]),           label: 0 },
        ];

        let batch: FeatureBatch<B> = batcher.batch(items, &device);
        assert_eq!(batch.features.dims(), [2, 3]);

        let x: Vec<f32> = batch.features.into_data().to_vec::<f32>().unwrap();
        // column 1 has scale 0 and drops out
        assert_eq!(x, vec![2.0, 0.0, 0.0, 0.0, 0.0, 3.0]);
        let y: Vec<i64> = batch.targets.into_data().convert::<i64>().to_vec::<i64>().unwrap();
        assert_eq!(y, vec![1, 0]);
    }
}
