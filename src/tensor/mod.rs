//! # Tensor Module
//!
//! This module defines the `Tensor` type used by every layer, the crate-wide
//! `TensorError`, and a handful of constructors.
//!
//! There is no autograd here: gradients are computed by hand in each layer's
//! `backward`, so a tensor is just an owned n-dimensional `ndarray` array.

use ndarray::{ArrayD, IxDyn};

// --- Submodules ---
pub mod ops;

// --- Error Handling ---
#[derive(thiserror::Error, Debug)]
pub enum TensorError {
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("Keep probability must be in (0, 1], got {0}")]
    InvalidProbability(f64),
    #[error("Layer '{layer}': backward called without matching forward")]
    EmptyCache { layer: String },
    #[error("ndarray error: {0}")]
    NdarrayError(#[from] ndarray::ShapeError),
}

// Define a type alias for the underlying data type (e.g., f32)
pub type TensorData = f32;

/// # Tensor
///
/// An owned, dynamically-shaped array of `TensorData`.
pub type Tensor = ArrayD<TensorData>;

// --- Helper functions ---

/// Helper to create a tensor filled with zeros.
pub fn zeros(shape: &[usize]) -> Tensor {
    ArrayD::zeros(IxDyn(shape))
}

/// Helper to create a tensor filled with ones.
pub fn ones(shape: &[usize]) -> Tensor {
    ArrayD::ones(IxDyn(shape))
}

/// Builds a tensor of the given shape from row-major data.
pub fn from_vec(shape: &[usize], data: Vec<TensorData>) -> Result<Tensor, TensorError> {
    Ok(ArrayD::from_shape_vec(IxDyn(shape), data)?)
}

/// Checks that `keep_probability` lies in (0, 1] and that the inverted-dropout
/// scale `1 / keep_probability` fits in a `TensorData`. NaN is rejected.
pub fn validate_probability(keep_probability: f64) -> Result<f64, TensorError> {
    let in_range = keep_probability > 0.0 && keep_probability <= 1.0;
    if in_range && ((1.0 / keep_probability) as TensorData).is_finite() {
        Ok(keep_probability)
    } else {
        Err(TensorError::InvalidProbability(keep_probability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_rejects_wrong_length() {
        let err = from_vec(&[2, 2], vec![1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, TensorError::NdarrayError(_)));
    }

    #[test]
    fn probability_bounds() {
        assert!(validate_probability(1.0).is_ok());
        assert!(validate_probability(1e-6).is_ok());
        assert!(validate_probability(0.0).is_err());
        assert!(validate_probability(-0.5).is_err());
        assert!(validate_probability(1.5).is_err());
        assert!(validate_probability(f64::NAN).is_err());
    }

    #[test]
    fn probability_whose_scale_overflows_f32_is_rejected() {
        assert!(validate_probability(1e-30).is_ok());
        assert!(matches!(
            validate_probability(1e-40),
            Err(TensorError::InvalidProbability(p)) if p == 1e-40
        ));
    }

    #[test]
    fn zeros_and_ones_have_requested_shape() {
        let z = zeros(&[2, 3]);
        let o = ones(&[2, 3]);
        assert_eq!(z.shape(), &[2, 3]);
        assert!(z.iter().all(|&v| v == 0.0));
        assert_eq!(&o + &z, o);
    }
}
