//! # Utility Functions (`utils`)
//!
//! Provides helper functions for serialization and parallelism.

pub mod serialization;
pub mod parallel;

pub use serialization::{load_model, load_spec, save_spec, spec_from_bytes, spec_to_bytes, SerializationError};
