// ============================================================
// Layer 5 — Softmax Regression Model (Burn)
// ============================================================
// Multinomial logistic regression is one Linear layer followed by
// softmax:
//
//     logits = x · W + b           x: [batch, d]   W: [d, k]   b: [k]
//     p      = softmax(logits)
//
// Training minimises mean cross-entropy plus an L2 penalty on the
// weights (not on the bias):
//
//     loss = CE(logits, y) + reg_param / 2 · ‖W‖²
//
// Weights and bias start at zero. The problem is convex, so a
// zero start gives the same optimum as a random one and keeps two
// runs on the same data identical.
//
// Reference: Burn Book §3 (Building Blocks)

use anyhow::{anyhow, Result};
use burn::{
    nn::{loss::CrossEntropyLossConfig, Initializer, Linear, LinearConfig},
    prelude::*,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
#[derive(Config, Debug)]
pub struct SoftmaxRegressionConfig {
    pub num_features: usize,
    pub num_classes:  usize,
}

impl SoftmaxRegressionConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SoftmaxRegression<B> {
        let linear = LinearConfig::new(self.num_features, self.num_classes)
            .with_initializer(Initializer::Zeros)
            .init(device);
        SoftmaxRegression { linear }
    }
}

#[derive(Module, Debug)]
pub struct SoftmaxRegression<B: Backend> {
    pub linear: Linear<B>,
}

/// Learned parameters copied out of the tensors.
/// `weights` is row-major [num_features, num_classes].
pub struct RawWeights {
    pub weights:     Vec<f32>,
    pub bias:        Vec<f32>,
    pub num_classes: usize,
}

impl<B: Backend> SoftmaxRegression<B> {
    /// x: [batch, d] → logits: [batch, k]
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        self.linear.forward(x)
    }

    /// Sum of squared weights, bias excluded
    pub fn l2_penalty(&self) -> Tensor<B, 1> {
        self.linear.weight.val().powf_scalar(2.0).sum()
    }

    pub fn forward_loss(
        &self,
        x:         Tensor<B, 2>,
        targets:   Tensor<B, 1, Int>,
        reg_param: f64,
    ) -> Tensor<B, 1> {
        let logits = self.forward(x);
        let ce = CrossEntropyLossConfig::new().init(&logits.device());
        let loss = ce.forward(logits, targets);
        if reg_param > 0.0 {
            loss + self.l2_penalty().mul_scalar(reg_param / 2.0)
        } else {
            loss
        }
    }

    pub fn raw_weights(&self) -> Result<RawWeights> {
        let [_, num_classes] = self.linear.weight.val().dims();
        let weights = self
            .linear
            .weight
            .val()
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read weights: {e:?}"))?;
        let bias = match &self.linear.bias {
            Some(b) => b
                .val()
                .into_data()
                .to_vec::<f32>()
                .map_err(|e| anyhow!("Cannot read bias: {e:?}"))?,
            None => vec![0.0; num_classes],
        };
        Ok(RawWeights { weights, bias, num_classes })
    }
}
