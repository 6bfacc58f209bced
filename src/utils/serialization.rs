//! # Model Spec Serialization Utilities
//!
//! Functions for saving and loading model descriptions.
//! Uses `serde` for serialization and `bincode` as the binary format.
//!
//! Only the architecture is stored. Dropout and ReLU have no learnable
//! parameters, and cached masks never outlive a forward/backward pair.

use crate::config::ModelSpec;
use crate::nn::Sequential;
use crate::tensor::TensorError;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

// --- Error Type ---
#[derive(thiserror::Error, Debug)]
pub enum SerializationError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization Error (Bincode): {0}")]
    Bincode(#[from] bincode::Error),
    #[error("Invalid layer in spec: {0}")]
    Tensor(#[from] TensorError),
}

// --- In-memory ---

pub fn spec_to_bytes(spec: &ModelSpec) -> Result<Vec<u8>, SerializationError> {
    Ok(bincode::serialize(spec)?)
}

pub fn spec_from_bytes(bytes: &[u8]) -> Result<ModelSpec, SerializationError> {
    Ok(bincode::deserialize(bytes)?)
}

// --- Save Function ---

/// Saves a model description to a file.
///
/// # Arguments
/// * `spec`: The layers to save.
/// * `path`: The file path where the description will be written.
pub fn save_spec<P: AsRef<Path>>(spec: &ModelSpec, path: P) -> Result<(), SerializationError> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    bincode::serialize_into(writer, spec)?;
    debug!(path = %path.as_ref().display(), layers = spec.layers.len(), "saved model spec");
    Ok(())
}

// --- Load Function ---

/// Loads a model description previously written by [`save_spec`].
pub fn load_spec<P: AsRef<Path>>(path: P) -> Result<ModelSpec, SerializationError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let spec: ModelSpec = bincode::deserialize_from(reader)?;
    debug!(path = %path.as_ref().display(), layers = spec.layers.len(), "loaded model spec");
    Ok(spec)
}

/// Loads a description and builds the model it describes.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Sequential, SerializationError> {
    let spec = load_spec(path)?;
    Ok(Sequential::from_spec(&spec)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DropoutConfig, LayerSpec};

    #[test]
    fn bytes_preserve_spec() {
        let spec = ModelSpec::new()
            .push(LayerSpec::ReLU { name: None })
            .push(LayerSpec::Dropout(DropoutConfig { keep_probability: 0.75, name: Some("d".into()) }));
        let bytes = spec_to_bytes(&spec).unwrap();
        assert_eq!(spec_from_bytes(&bytes).unwrap(), spec);
    }

    #[test]
    fn truncated_bytes_fail() {
        let spec = ModelSpec::new().push(LayerSpec::Dropout(DropoutConfig::default()));
        let bytes = spec_to_bytes(&spec).unwrap();
        assert!(matches!(
            spec_from_bytes(&bytes[..bytes.len() - 3]),
            Err(SerializationError::Bincode(_))
        ));
    }
}
