use burn::data::dataset::Dataset;

use crate::ml::sparse::SparseVector;

/// One training row: TF-IDF features and the encoded label.
#[derive(Debug, Clone)]
pub struct FeatureSample {
    pub features: SparseVector,
    pub label:    usize,
}

pub struct FeatureDataset {
    samples: Vec<FeatureSample>,
}

impl FeatureDataset {
    pub fn new(samples: Vec<FeatureSample>) -> Self { Self { samples } }

    /// Pair feature rows with labels, one sample per row
    pub fn from_rows(rows: &[&SparseVector], labels: &[usize]) -> Self {
        let samples = rows
            .iter()
            .zip(labels)
            .map(|(&features, &label)| FeatureSample { features: features.clone(), label })
            .collect();
        Self { samples }
    }

    pub fn num_features(&self) -> Option<usize> {
        self.samples.first().map(|s| s.features.size)
    }
}

impl Dataset<FeatureSample> for FeatureDataset {
    fn get(&self, index: usize) -> Option<FeatureSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_pairs_in_order() {
        let a = SparseVector::from_pairs(3, vec![(0, 1.0)]);
        let b = SparseVector::from_pairs(3, vec![(2, 4.0)]);
        let ds = FeatureDataset::from_rows(&[&a, &b], &[1, 0]);

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.num_features(), Some(3));
        let second = ds.get(1).unwrap();
        assert_eq!(second.features, b);
        assert_eq!(second.label, 0);
        assert!(ds.get(2).is_none());
    }
}
