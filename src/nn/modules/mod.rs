//! # Neural Network Layer Modules
//!
//! Parameter-free layers implementing the `Layer` contract.

// --- Re-export Layer Implementations ---
pub mod activation;
pub use activation::ReLU;

pub mod dropout;
pub use dropout::Dropout;
