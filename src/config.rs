//! # Layer and Model Configuration
//!
//! Plain serde structs describing layers, so a model can be rebuilt from a
//! saved description (`utils::serialization`). Values are validated when a
//! layer is built, not when the config is deserialized.

use serde::{Deserialize, Serialize};

/// Settings for a [`Dropout`](crate::nn::Dropout) layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropoutConfig {
    /// Probability of keeping a unit, in (0, 1].
    pub keep_probability: f64,
    #[serde(default)]
    pub name: Option<String>,
}

impl Default for DropoutConfig {
    fn default() -> Self {
        DropoutConfig { keep_probability: 0.5, name: None }
    }
}

/// One layer of a [`ModelSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerSpec {
    Dropout(DropoutConfig),
    ReLU { name: Option<String> },
}

/// Ordered list of layers making up a `Sequential` model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelSpec {
    pub layers: Vec<LayerSpec>,
}

impl ModelSpec {
    pub fn new() -> Self {
        ModelSpec::default()
    }

    /// Appends a layer description.
    pub fn push(mut self, layer: LayerSpec) -> Self {
        self.layers.push(layer);
        self
    }
}
