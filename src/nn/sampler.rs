//! # Mask Samplers
//!
//! Random sources for dropout masks. A sampler plays the role of a binomial
//! draw with a single trial: given a probability and a shape it returns an
//! array of 0s and 1s. Layers hold a boxed sampler so tests can inject a
//! seeded or fully scripted one.

use crate::tensor::{validate_probability, Tensor, TensorError};
use ndarray::{ArrayD, IxDyn};
use ndarray_rand::rand_distr::Bernoulli;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Debug;

/// Produces 0/1 masks.
pub trait MaskSampler: Debug + Send {
    /// Returns an array of `shape` whose entries are independently 1 with
    /// probability `probability` and 0 otherwise.
    fn sample(&mut self, probability: f64, shape: &[usize]) -> Result<Tensor, TensorError>;
}

/// Bernoulli sampler backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct BernoulliSampler<R: Rng = StdRng> {
    rng: R,
}

impl BernoulliSampler<StdRng> {
    /// Seeds a `StdRng` from the operating system.
    pub fn from_entropy() -> Self {
        BernoulliSampler { rng: StdRng::from_entropy() }
    }

    /// Deterministic sampler: equal seeds give equal mask sequences.
    pub fn seeded(seed: u64) -> Self {
        BernoulliSampler { rng: StdRng::seed_from_u64(seed) }
    }
}

impl<R: Rng> BernoulliSampler<R> {
    pub fn with_rng(rng: R) -> Self {
        BernoulliSampler { rng }
    }
}

impl<R: Rng + Debug + Send> MaskSampler for BernoulliSampler<R> {
    fn sample(&mut self, probability: f64, shape: &[usize]) -> Result<Tensor, TensorError> {
        let probability = validate_probability(probability)?;
        let distribution =
            Bernoulli::new(probability).map_err(|_| TensorError::InvalidProbability(probability))?;
        let draws: ArrayD<bool> = ArrayD::random_using(IxDyn(shape), distribution, &mut self.rng);
        Ok(draws.mapv(|keep| if keep { 1.0 } else { 0.0 }))
    }
}

/// Replays a fixed 0/1 pattern in row-major order, wrapping around when the
/// requested shape has more elements than the pattern. The probability
/// argument is ignored.
#[derive(Debug, Clone)]
pub struct FixedSampler {
    pattern: Vec<f32>,
}

impl FixedSampler {
    /// Non-zero entries are treated as 1. An empty pattern keeps everything.
    pub fn new(pattern: Vec<f32>) -> Self {
        let pattern = if pattern.is_empty() {
            vec![1.0]
        } else {
            pattern.into_iter().map(|v| if v != 0.0 { 1.0 } else { 0.0 }).collect()
        };
        FixedSampler { pattern }
    }
}

impl MaskSampler for FixedSampler {
    fn sample(&mut self, _probability: f64, shape: &[usize]) -> Result<Tensor, TensorError> {
        let len: usize = shape.iter().product();
        let data: Vec<f32> = self.pattern.iter().copied().cycle().take(len).collect();
        Ok(ArrayD::from_shape_vec(IxDyn(shape), data)?)
    }
}
