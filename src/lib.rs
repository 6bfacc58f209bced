//! # edunn_dropout
//!
//! Layers for a small neural network library trained with hand-written
//! backpropagation. Each layer implements [`nn::Layer`]: `forward` computes
//! the output and caches what is needed, `backward` turns δE/δy into δE/δx.
//!
//! The centrepiece is [`nn::Dropout`] (inverted dropout). [`nn::ReLU`] and
//! [`nn::Sequential`] exist so layers can be composed and tested together.

pub mod config;
pub mod nn;
pub mod tensor;
pub mod utils;

pub mod prelude {
    pub use crate::config::{DropoutConfig, LayerSpec, ModelSpec};
    pub use crate::nn::{Dropout, Layer, ParameterGradients, Phase, ReLU, Sequential};
    pub use crate::tensor::{Tensor, TensorError};
}
