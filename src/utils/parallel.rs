//! # Parallelism Utilities (CPU Threading)
//!
//! Element-wise helpers that switch to `rayon` once a tensor is large enough
//! for the thread pool to pay off. Results are identical either way.

use crate::tensor::{Tensor, TensorData};
use ndarray::{ArrayD, Zip};
use rayon::prelude::*;

/// Element count above which element-wise maps run on the rayon pool.
pub const PARALLEL_THRESHOLD: usize = 1 << 16;

/// Applies `f` pairwise to two same-shape tensors.
///
/// Callers are responsible for checking shapes (`tensor::ops::ensure_same_shape`).
pub(crate) fn zip_map<F>(lhs: &Tensor, rhs: &Tensor, f: F) -> Tensor
where
    F: Fn(TensorData, TensorData) -> TensorData + Sync + Send,
{
    if lhs.len() < PARALLEL_THRESHOLD {
        return Zip::from(lhs).and(rhs).map_collect(|&a, &b| f(a, b));
    }

    // Contiguous inputs: split the raw slices directly.
    if let (Some(a), Some(b)) = (lhs.as_slice(), rhs.as_slice()) {
        let data: Vec<TensorData> = a.par_iter().zip(b.par_iter()).map(|(&x, &y)| f(x, y)).collect();
        if let Ok(out) = ArrayD::from_shape_vec(lhs.raw_dim(), data) {
            return out;
        }
    }

    Zip::from(lhs).and(rhs).par_map_collect(|&a, &b| f(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    #[test]
    fn parallel_and_serial_paths_agree() {
        let n = PARALLEL_THRESHOLD + 17;
        let a = ArrayD::from_shape_fn(IxDyn(&[n]), |i| i[0] as f32);
        let b = ArrayD::from_shape_fn(IxDyn(&[n]), |i| (i[0] % 3) as f32);
        let big = zip_map(&a, &b, |x, y| x * y);

        let small_a = ArrayD::from_shape_fn(IxDyn(&[10]), |i| i[0] as f32);
        let small_b = ArrayD::from_shape_fn(IxDyn(&[10]), |i| (i[0] % 3) as f32);
        let small = zip_map(&small_a, &small_b, |x, y| x * y);

        assert_eq!(big.len(), n);
        for i in 0..10 {
            assert_eq!(big[[i]], small[[i]]);
        }
        assert_eq!(big[[n - 1]], ((n - 1) as f32) * (((n - 1) % 3) as f32));
    }

    #[test]
    fn non_contiguous_input_falls_back_to_zip() {
        let n = PARALLEL_THRESHOLD * 2;
        let a = ArrayD::from_shape_fn(IxDyn(&[n, 2]), |i| i[0] as f32);
        let b = ArrayD::<f32>::ones(IxDyn(&[2, n]));
        // Transposed copy keeps column-major memory order, so `as_slice` is None.
        let at = a.t().to_owned();
        assert!(at.as_slice().is_none());
        let out = zip_map(&at, &b, |x, y| x + y);
        assert_eq!(out.shape(), &[2, n]);
        assert_eq!(out, at.mapv(|x| x + 1.0));
    }
}
