// ============================================================
// Layer 5 — IDF stage
// ============================================================
// raw_features → features
//
// Fit counts, per vocabulary column, the number of training
// documents with a non-zero count (df) and stores
//
//     idf = ln((m + 1) / (df + 1))        m = number of documents
//
// Columns with df below `min_doc_freq` get an idf of 0. Transform
// multiplies each stored count by its column's idf. No row
// normalisation happens here.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::ml::frame::Frame;
use crate::ml::pipeline::{Estimator, FittedStage, Transformer};
use crate::ml::sparse::SparseVector;

#[derive(Debug, Clone, Default)]
pub struct Idf {
    pub min_doc_freq: usize,
}

impl Idf {
    pub fn new(min_doc_freq: usize) -> Self {
        Self { min_doc_freq }
    }
}

impl Estimator for Idf {
    fn name(&self) -> &'static str {
        "idf"
    }

    fn fit(&self, frame: &Frame) -> Result<FittedStage> {
        let Some(first) = frame.rows.first() else {
            bail!("Cannot fit IDF on an empty frame");
        };
        let size = first.require_raw_features()?.size;

        let mut df = vec![0usize; size];
        for row in &frame.rows {
            for (i, v) in row.require_raw_features()?.iter() {
                if v > 0.0 {
                    df[i] += 1;
                }
            }
        }

        let m = frame.len() as f64;
        let weights = df
            .iter()
            .map(|&d| {
                if d >= self.min_doc_freq {
                    ((m + 1.0) / (d as f64 + 1.0)).ln() as f32
                } else {
                    0.0
                }
            })
            .collect();

        Ok(FittedStage::Idf(IdfModel { doc_freq: df, num_docs: frame.len(), idf: weights }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdfModel {
    pub doc_freq: Vec<usize>,
    pub num_docs: usize,
    pub idf:      Vec<f32>,
}

impl IdfModel {
    pub fn weigh(&self, v: &SparseVector) -> SparseVector {
        SparseVector {
            size:    v.size,
            indices: v.indices.clone(),
            values:  v.iter().map(|(i, x)| x * self.idf[i]).collect(),
        }
    }
}

impl Transformer for IdfModel {
    fn transform(&self, frame: &mut Frame) -> Result<()> {
        for row in &mut frame.rows {
            let raw = row.require_raw_features()?;
            if raw.size != self.idf.len() {
                bail!(
                    "Feature size {} does not match IDF size {}",
                    raw.size,
                    self.idf.len()
                );
            }
            row.features = Some(self.weigh(raw));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(vectors: Vec<SparseVector>) -> Frame {
        let mut frame = Frame::from_texts(vectors.iter().map(|_| String::new()));
        for (row, v) in frame.rows.iter_mut().zip(vectors) {
            row.raw_features = Some(v);
        }
        frame
    }

    #[test]
    fn test_idf_formula() {
        let f = frame(vec![
            SparseVector::from_pairs(3, vec![(0, 1.0), (1, 2.0)]),
            SparseVector::from_pairs(3, vec![(0, 3.0)]),
        ]);
        let FittedStage::Idf(model) = Idf::new(0).fit(&f).unwrap() else {
            panic!("expected IDF model");
        };
        assert_eq!(model.doc_freq, vec![2, 1, 0]);
        let expect = |df: f64| (3.0 / (df + 1.0)).ln() as f32;
        assert!((model.idf[0] - expect(2.0)).abs() < 1e-6);
        assert!((model.idf[1] - expect(1.0)).abs() < 1e-6);
        assert!((model.idf[2] - expect(0.0)).abs() < 1e-6);
    }

    #[test]
    fn test_transform_scales_counts() {
        let model = IdfModel { doc_freq: vec![1, 1], num_docs: 2, idf: vec![0.5, 2.0] };
        let mut f = frame(vec![SparseVector::from_pairs(2, vec![(0, 4.0), (1, 1.0)])]);
        model.transform(&mut f).unwrap();
        assert_eq!(f.rows[0].features.as_ref().unwrap().values, vec![2.0, 2.0]);
    }

    #[test]
    fn test_min_doc_freq_zeroes_rare_columns() {
        let f = frame(vec![
            SparseVector::from_pairs(2, vec![(0, 1.0)]),
            SparseVector::empty(2),
        ]);
        let FittedStage::Idf(model) = Idf::new(1).fit(&f).unwrap() else {
            panic!("expected IDF model");
        };
        assert_eq!(model.idf[1], 0.0);
        assert!(model.idf[0] > 0.0);
    }
}
