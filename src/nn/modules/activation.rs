//! # Activation Function Modules

use crate::nn::functional as F; // Use functional interface
use crate::nn::{Cache, Layer, ParameterGradients, Phase};
use crate::tensor::{Tensor, TensorError};
use tracing::debug;

/// Applies the Rectified Linear Unit function element-wise.
/// `ReLU(x) = max(0, x)`
///
/// Behaves the same in both phases; the phase is only stored.
#[derive(Debug, Clone, Default)]
pub struct ReLU {
    phase: Phase,
    name: Option<String>,
    // 0/1 indicator of positive inputs from the last forward.
    cache: Cache<Tensor>,
}

impl ReLU {
    /// Creates a new ReLU layer.
    pub fn new() -> Self {
        ReLU::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Layer for ReLU {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("ReLU")
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    fn forward(&mut self, input: &Tensor) -> Result<Tensor, TensorError> {
        let (output, indicator) = F::relu(input);
        self.cache.set(indicator);
        debug!(layer = self.name(), shape = ?input.shape(), "relu forward");
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<(Tensor, ParameterGradients), TensorError> {
        let indicator = self
            .cache
            .take()
            .ok_or_else(|| TensorError::EmptyCache { layer: self.name().to_string() })?;
        let grad_input = F::relu_backward(grad_output, &indicator)?;
        Ok((grad_input, ParameterGradients::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::from_vec;

    #[test]
    fn backward_requires_forward() {
        let mut relu = ReLU::new().with_name("act");
        match relu.backward(&from_vec(&[1], vec![1.0]).unwrap()) {
            Err(TensorError::EmptyCache { layer }) => assert_eq!(layer, "act"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn gradient_is_masked_by_sign() {
        let mut relu = ReLU::new();
        relu.forward(&from_vec(&[2, 2], vec![1.0, -1.0, -3.0, 0.5]).unwrap()).unwrap();
        let (dx, grads) = relu.backward(&from_vec(&[2, 2], vec![2.0; 4]).unwrap()).unwrap();
        assert_eq!(dx, from_vec(&[2, 2], vec![2.0, 0.0, 0.0, 2.0]).unwrap());
        assert!(grads.is_empty());
    }
}
