//! # Tensor Operations
//!
//! Element-wise operations used by the layers' forward and backward passes.
//! Unlike NumPy, shapes must match exactly: no broadcasting.

use super::{Tensor, TensorError};
use crate::utils::parallel;

/// Returns an error unless both shapes are identical.
pub fn ensure_same_shape(expected: &[usize], got: &[usize]) -> Result<(), TensorError> {
    if expected != got {
        return Err(TensorError::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        });
    }
    Ok(())
}

/// Element-wise multiplication of two same-shape tensors.
///
/// Large tensors are multiplied on the rayon pool (see `utils::parallel`).
pub fn mul(lhs: &Tensor, rhs: &Tensor) -> Result<Tensor, TensorError> {
    ensure_same_shape(lhs.shape(), rhs.shape())?;
    Ok(parallel::zip_map(lhs, rhs, |a, b| a * b))
}
