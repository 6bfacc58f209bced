//! # Neural Network Functional Interface (`nn::functional`)
//!
//! Stateless forms of the layer computations. The layer modules delegate
//! here and only add phase handling and caching on top.

use crate::nn::sampler::MaskSampler;
use crate::nn::Phase;
use crate::tensor::{ops, validate_probability, Tensor, TensorError};

// --- Dropout ---

/// Inverted dropout.
///
/// In `Phase::Training` draws a 0/1 mask from `sampler`, scales it by
/// `1 / keep_probability` and returns `(input * mask, Some(mask))`.
/// In `Phase::Inference` returns an unchanged copy of `input` and no mask;
/// the random draw is skipped since it could not affect the result.
pub fn dropout(
    input: &Tensor,
    keep_probability: f64,
    phase: Phase,
    sampler: &mut dyn MaskSampler,
) -> Result<(Tensor, Option<Tensor>), TensorError> {
    let keep_probability = validate_probability(keep_probability)?;
    match phase {
        Phase::Inference => Ok((input.clone(), None)),
        Phase::Training => {
            let binary = sampler.sample(keep_probability, input.shape())?;
            ops::ensure_same_shape(input.shape(), binary.shape())?;
            // Dropped units stay exactly zero whatever the scale.
            let scale = (1.0 / keep_probability) as f32;
            let mask = binary.mapv(|b| if b != 0.0 { scale } else { 0.0 });
            let output = ops::mul(input, &mask)?;
            Ok((output, Some(mask)))
        }
    }
}

/// Gradient of `input * mask` with respect to `input`.
///
/// The `1 / keep_probability` factor is already part of `mask`.
pub fn dropout_backward(grad_output: &Tensor, mask: &Tensor) -> Result<Tensor, TensorError> {
    ops::mul(grad_output, mask)
}

// --- Activation Functions ---

/// Applies the Rectified Linear Unit (ReLU) function element-wise.
/// `relu(x) = max(0, x)`
///
/// Also returns the 0/1 indicator of `x > 0`, which is the local derivative.
pub fn relu(input: &Tensor) -> (Tensor, Tensor) {
    let output = input.mapv(|x| x.max(0.0));
    let indicator = input.mapv(|x| if x > 0.0 { 1.0 } else { 0.0 });
    (output, indicator)
}

/// Gradient of ReLU given the indicator produced by [`relu`].
pub fn relu_backward(grad_output: &Tensor, indicator: &Tensor) -> Result<Tensor, TensorError> {
    ops::mul(grad_output, indicator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::sampler::{BernoulliSampler, FixedSampler};
    use crate::tensor::from_vec;

    #[test]
    fn training_scales_kept_units() {
        let x = from_vec(&[4], vec![2.0, 4.0, 6.0, 8.0]).unwrap();
        let mut sampler = FixedSampler::new(vec![1.0, 0.0, 1.0, 1.0]);
        let (y, mask) = dropout(&x, 0.5, Phase::Training, &mut sampler).unwrap();
        assert_eq!(y, from_vec(&[4], vec![4.0, 0.0, 12.0, 16.0]).unwrap());
        assert_eq!(mask.unwrap(), from_vec(&[4], vec![2.0, 0.0, 2.0, 2.0]).unwrap());
    }

    #[test]
    fn tiny_keep_probability_leaves_dropped_units_at_zero() {
        let x = from_vec(&[2], vec![1.0, 1.0]).unwrap();
        let mut sampler = FixedSampler::new(vec![1.0, 0.0]);
        let (y, mask) = dropout(&x, 1e-30, Phase::Training, &mut sampler).unwrap();
        let mask = mask.unwrap();
        assert_eq!(mask[[1]], 0.0);
        assert_eq!(y[[1]], 0.0);
        assert!(mask[[0]].is_finite() && mask[[0]] > 1e29);

        let dx = dropout_backward(&x, &mask).unwrap();
        assert_eq!(dx[[1]], 0.0);
        assert!(dx.iter().all(|v| v.is_finite()));

        assert!(matches!(
            dropout(&x, 1e-40, Phase::Training, &mut sampler),
            Err(TensorError::InvalidProbability(_))
        ));
    }

    #[test]
    fn inference_is_identity_without_mask() {
        let x = from_vec(&[2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let mut sampler = BernoulliSampler::seeded(3);
        let (y, mask) = dropout(&x, 0.1, Phase::Inference, &mut sampler).unwrap();
        assert_eq!(y, x);
        assert!(mask.is_none());
    }

    #[test]
    fn dropout_validates_probability() {
        let x = from_vec(&[1], vec![1.0]).unwrap();
        let mut sampler = BernoulliSampler::seeded(3);
        let err = dropout(&x, 0.0, Phase::Training, &mut sampler).unwrap_err();
        assert!(matches!(err, TensorError::InvalidProbability(p) if p == 0.0));
    }

    #[test]
    fn relu_and_gradient() {
        let x = from_vec(&[4], vec![-1.0, 0.0, 2.0, 3.0]).unwrap();
        let (y, indicator) = relu(&x);
        assert_eq!(y, from_vec(&[4], vec![0.0, 0.0, 2.0, 3.0]).unwrap());
        let g = from_vec(&[4], vec![5.0, 5.0, 5.0, 5.0]).unwrap();
        let dx = relu_backward(&g, &indicator).unwrap();
        assert_eq!(dx, from_vec(&[4], vec![0.0, 0.0, 5.0, 5.0]).unwrap());
    }
}
