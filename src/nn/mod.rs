//! # Neural Network Module (`nn`)
//!
//! Building blocks for networks trained with hand-written backpropagation.
//! Every layer computes its own input gradient in `backward`, using whatever
//! it stashed in its cache during `forward`.

use crate::config::{LayerSpec, ModelSpec};
use crate::tensor::{Tensor, TensorError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use tracing::trace;

// --- Submodules ---
pub mod cache;
pub mod functional;
pub mod modules;
pub mod sampler;

// Re-export common items
pub use cache::Cache;
pub use modules::*;
pub use sampler::{BernoulliSampler, FixedSampler, MaskSampler};

/// Gradients of a layer's learnable parameters, keyed by parameter name.
/// Parameter-free layers return an empty map.
pub type ParameterGradients = BTreeMap<String, Tensor>;

/// Whether a pass is part of training or inference.
///
/// Set on each layer by the owning model before a pass; layers never read it
/// from global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Training,
    Inference,
}

// --- Core Trait: Layer ---

/// Contract shared by all layers.
///
/// `forward` and `backward` take `&mut self` because a layer keeps the
/// values needed for its gradient in a single-slot cache between the two.
pub trait Layer: Debug + Send {
    /// Human readable name, used in logs and error messages.
    fn name(&self) -> &str;

    fn phase(&self) -> Phase;

    fn set_phase(&mut self, phase: Phase);

    /// Switches to `Phase::Training`.
    fn train(&mut self) {
        self.set_phase(Phase::Training);
    }

    /// Switches to `Phase::Inference`.
    fn eval(&mut self) {
        self.set_phase(Phase::Inference);
    }

    /// Computes the layer output and caches what `backward` will need.
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, TensorError>;

    /// Given δE/δy, returns δE/δx and the gradients of the layer parameters.
    ///
    /// Fails with `TensorError::EmptyCache` if there is no matching `forward`.
    fn backward(&mut self, grad_output: &Tensor) -> Result<(Tensor, ParameterGradients), TensorError>;

    /// Learnable parameters by name. Empty by default.
    fn parameters(&self) -> BTreeMap<String, Tensor> {
        BTreeMap::new()
    }
}

// --- Sequential container ---

/// A sequential container for layers.
/// Forward applies each layer in order; backward walks them in reverse.
#[derive(Debug, Default)]
pub struct Sequential {
    layers: Vec<Box<dyn Layer>>,
    phase: Phase,
}

impl Sequential {
    /// Creates a new empty Sequential container.
    pub fn new() -> Self {
        Sequential { layers: Vec::new(), phase: Phase::default() }
    }

    /// Creates a Sequential container from a vector of layers.
    /// Every layer is switched to the container's phase.
    pub fn from_layers(layers: Vec<Box<dyn Layer>>) -> Self {
        let mut model = Sequential::new();
        for layer in layers {
            model.add(layer);
        }
        model
    }

    /// Builds every layer described by `spec`, in order.
    pub fn from_spec(spec: &ModelSpec) -> Result<Self, TensorError> {
        let mut model = Sequential::new();
        for layer_spec in &spec.layers {
            model.add(build_layer(layer_spec)?);
        }
        Ok(model)
    }

    /// Adds a layer to the end of the sequence.
    pub fn add(&mut self, mut layer: Box<dyn Layer>) {
        layer.set_phase(self.phase);
        self.layers.push(layer);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }
}

fn build_layer(spec: &LayerSpec) -> Result<Box<dyn Layer>, TensorError> {
    Ok(match spec {
        LayerSpec::Dropout(config) => Box::new(Dropout::from_config(config)?),
        LayerSpec::ReLU { name } => {
            let relu = ReLU::new();
            Box::new(match name {
                Some(name) => relu.with_name(name.clone()),
                None => relu,
            })
        }
    })
}

impl Layer for Sequential {
    fn name(&self) -> &str {
        "Sequential"
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn set_phase(&mut self, phase: Phase) {
        trace!(?phase, layers = self.layers.len(), "sequential phase change");
        self.phase = phase;
        for layer in &mut self.layers {
            layer.set_phase(phase);
        }
    }

    fn forward(&mut self, input: &Tensor) -> Result<Tensor, TensorError> {
        let mut current = input.clone();
        for layer in &mut self.layers {
            current = layer.forward(&current)?;
        }
        Ok(current)
    }

    /// Runs each layer's backward from last to first.
    ///
    /// A wrongly shaped `grad_output` is rejected by the last layer before any
    /// cache is consumed, so the call can be retried. If an inner layer fails
    /// instead (e.g. its forward never ran), the layers after it have already
    /// used their caches and a new forward pass is needed.
    fn backward(&mut self, grad_output: &Tensor) -> Result<(Tensor, ParameterGradients), TensorError> {
        let mut grad = grad_output.clone();
        let mut parameter_grads = ParameterGradients::new();
        for (i, layer) in self.layers.iter_mut().enumerate().rev() {
            let (grad_input, layer_grads) = layer.backward(&grad)?;
            for (name, g) in layer_grads {
                // Prefix parameter names with layer index for uniqueness
                parameter_grads.insert(format!("{}.{}", i, name), g);
            }
            grad = grad_input;
        }
        Ok((grad, parameter_grads))
    }

    fn parameters(&self) -> BTreeMap<String, Tensor> {
        let mut params = BTreeMap::new();
        for (i, layer) in self.layers.iter().enumerate() {
            for (name, param) in layer.parameters() {
                params.insert(format!("{}.{}", i, name), param);
            }
        }
        params
    }
}
