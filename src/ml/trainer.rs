// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Fits SoftmaxRegression on sparse TF-IDF rows with Burn's Adam.
//
// Per iteration (one pass over the training rows):
//   1. The data loader shuffles the rows (seeded) and hands out
//      mini-batches, densified by FeatureBatcher into [batch, d]
//   2. Forward, cross-entropy + L2 loss, backward, Adam step
//
// Features are multiplied by a per-column scale (1 / std) before
// they reach the model, so the L2 penalty treats every column the
// same regardless of its raw magnitude. The learned weights are
// mapped back to raw feature space afterwards:
//
//     w_raw[j] = w_scaled[j] · scale[j]
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::data::{
    batcher::{FeatureBatch, FeatureBatcher},
    dataset::FeatureDataset,
};
use crate::ml::model::{SoftmaxRegression, SoftmaxRegressionConfig};
use crate::ml::sparse::SparseVector;

pub type ComputeDevice  = burn::backend::ndarray::NdArrayDevice;
type MyInnerBackend     = burn::backend::NdArray;
type MyBackend          = burn::backend::Autodiff<MyInnerBackend>;

#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub max_iter:      usize,
    pub reg_param:     f64,
    pub learning_rate: f64,
    pub batch_size:    usize,
    pub seed:          u64,
}

/// Coefficients in raw feature space plus the loss curve
pub struct TrainedWeights {
    /// [num_classes][num_features]
    pub coefficients:      Vec<Vec<f32>>,
    pub intercepts:        Vec<f32>,
    /// Mean loss of each iteration
    pub objective_history: Vec<f64>,
}

/// Per-column 1 / sample-std over sparse rows. Zero-variance
/// columns get a scale of 0, which pins their coefficient to 0.
pub fn inverse_std_scale(rows: &[&SparseVector], num_features: usize) -> Vec<f32> {
    let n = rows.len() as f64;
    let mut sum    = vec![0.0f64; num_features];
    let mut sum_sq = vec![0.0f64; num_features];
    for row in rows {
        for (i, v) in row.iter() {
            sum[i]    += v as f64;
            sum_sq[i] += (v as f64) * (v as f64);
        }
    }

    (0..num_features)
        .map(|j| {
            if n < 2.0 {
                return 0.0;
            }
            let mean = sum[j] / n;
            let var  = ((sum_sq[j] - n * mean * mean) / (n - 1.0)).max(0.0);
            if var > 0.0 { (1.0 / var.sqrt()) as f32 } else { 0.0 }
        })
        .collect()
}

pub fn train_softmax_regression(
    rows:         &[&SparseVector],
    labels:       &[usize],
    num_classes:  usize,
    scale:        &[f32],
    cfg:          &TrainerConfig,
    device:       &ComputeDevice,
) -> Result<TrainedWeights> {
    if rows.is_empty() {
        bail!("No training rows");
    }
    if rows.len() != labels.len() {
        bail!("{} feature rows but {} labels", rows.len(), labels.len());
    }
    let num_features = scale.len();
    let batch_size   = cfg.batch_size.max(1);

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: SoftmaxRegression<MyBackend> =
        SoftmaxRegressionConfig::new(num_features, num_classes).init(device);
    tracing::info!(
        "Softmax regression ready: {} features, {} classes",
        num_features,
        num_classes
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();
    let mut objective_history = Vec::with_capacity(cfg.max_iter);

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let batcher      = FeatureBatcher::new(scale.to_vec());
    let train_loader = DataLoaderBuilder::new(batcher)
        .batch_size(batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .set_device(device.clone())
        .build(FeatureDataset::from_rows(rows, labels));

    // ── Iteration loop ────────────────────────────────────────────────────────
    for iter in 1..=cfg.max_iter {
        let mut loss_sum = 0.0f64;
        for batch in train_loader.iter() {
            let batch: FeatureBatch<MyBackend> = batch;
            let [n]  = batch.targets.dims();
            let loss = model.forward_loss(batch.features, batch.targets, cfg.reg_param);
            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            loss_sum += loss_val * n as f64;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.learning_rate, model, grads);
        }

        let mean_loss = loss_sum / rows.len() as f64;
        tracing::info!("Iteration {:>3}/{} | loss={:.6}", iter, cfg.max_iter, mean_loss);
        objective_history.push(mean_loss);
    }

    // ── Copy weights out, back in raw feature space ───────────────────────────
    let raw = model.valid().raw_weights()?;
    let coefficients = (0..num_classes)
        .map(|c| {
            (0..num_features)
                .map(|j| raw.weights[j * raw.num_classes + c] * scale[j])
                .collect()
        })
        .collect();

    Ok(TrainedWeights { coefficients, intercepts: raw.bias, objective_history })
}
