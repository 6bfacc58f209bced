//! # Dropout Layer Module

use crate::config::DropoutConfig;
use crate::nn::functional as F;
use crate::nn::sampler::{BernoulliSampler, MaskSampler};
use crate::nn::{Cache, Layer, ParameterGradients, Phase};
use crate::tensor::{ops, validate_probability, Tensor, TensorError};
use tracing::{debug, trace, warn};

/// What `forward` leaves behind for `backward`.
#[derive(Debug, Clone)]
enum DropoutCache {
    /// Scaled mask used by a training pass.
    Mask(Tensor),
    /// An inference pass ran; it was the identity on a tensor of this shape.
    Identity(Vec<usize>),
}

/// Inverted dropout.
///
/// During training each element is kept with probability `keep_probability`
/// and the survivors are scaled by `1 / keep_probability`, so the expected
/// activation is unchanged. During inference the input passes through as is.
#[derive(Debug)]
pub struct Dropout {
    keep_probability: f64,
    phase: Phase,
    name: Option<String>,
    sampler: Box<dyn MaskSampler>,
    cache: Cache<DropoutCache>,
}

impl Dropout {
    /// Creates a new Dropout layer.
    /// # Arguments
    /// * `keep_probability`: Probability of an element being kept, in (0, 1].
    pub fn new(keep_probability: f64) -> Result<Self, TensorError> {
        Ok(Dropout {
            keep_probability: validate_probability(keep_probability)?,
            phase: Phase::default(),
            name: None,
            sampler: Box::new(BernoulliSampler::from_entropy()),
            cache: Cache::new(),
        })
    }

    pub fn from_config(config: &DropoutConfig) -> Result<Self, TensorError> {
        let layer = Dropout::new(config.keep_probability)?;
        Ok(match &config.name {
            Some(name) => layer.with_name(name.clone()),
            None => layer,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the random source used for masks.
    pub fn with_sampler(mut self, sampler: Box<dyn MaskSampler>) -> Self {
        self.sampler = sampler;
        self
    }

    /// Shorthand for a seeded `BernoulliSampler`.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_sampler(Box::new(BernoulliSampler::seeded(seed)))
    }

    pub fn keep_probability(&self) -> f64 {
        self.keep_probability
    }

    /// True while a forward pass is waiting for its backward pass.
    pub fn has_cached_mask(&self) -> bool {
        !self.cache.is_empty()
    }
}

impl Default for Dropout {
    /// Keeps half of the units.
    fn default() -> Self {
        Dropout {
            keep_probability: 0.5,
            phase: Phase::default(),
            name: None,
            sampler: Box::new(BernoulliSampler::from_entropy()),
            cache: Cache::new(),
        }
    }
}

impl Layer for Dropout {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("Dropout")
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn set_phase(&mut self, phase: Phase) {
        trace!(layer = self.name(), ?phase, "phase change");
        self.phase = phase;
    }

    fn forward(&mut self, input: &Tensor) -> Result<Tensor, TensorError> {
        let (output, mask) = F::dropout(input, self.keep_probability, self.phase, self.sampler.as_mut())?;
        debug!(
            layer = self.name(),
            phase = ?self.phase,
            shape = ?input.shape(),
            "dropout forward"
        );
        // Overwrites the mask of any forward that never saw its backward.
        self.cache.set(match mask {
            Some(mask) => DropoutCache::Mask(mask),
            None => DropoutCache::Identity(input.shape().to_vec()),
        });
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<(Tensor, ParameterGradients), TensorError> {
        let expected = match self.cache.peek() {
            None => {
                return Err(TensorError::EmptyCache { layer: self.name().to_string() });
            }
            Some(DropoutCache::Mask(mask)) => mask.shape().to_vec(),
            Some(DropoutCache::Identity(shape)) => shape.clone(),
        };
        // Validate before taking so a bad gradient does not lose the mask.
        ops::ensure_same_shape(&expected, grad_output.shape())?;

        let grad_input = match self.cache.take() {
            Some(DropoutCache::Mask(mask)) => F::dropout_backward(grad_output, &mask)?,
            Some(DropoutCache::Identity(_)) => {
                warn!(
                    layer = self.name(),
                    "backward after an inference forward; returning the identity gradient"
                );
                grad_output.clone()
            }
            None => return Err(TensorError::EmptyCache { layer: self.name().to_string() }),
        };
        debug!(layer = self.name(), shape = ?grad_output.shape(), "dropout backward");

        // Dropout has no parameters.
        Ok((grad_input, ParameterGradients::new()))
    }
}
