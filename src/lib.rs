//! A small convolutional classifier for `[batch, 3, 64, 64]` color images,
//! generic over any [burn backend](burn::tensor::backend::Backend).
//!
//! The network is a fixed topology: two convolution/activation/pooling
//! blocks, an explicit channel-major flatten, and a two-layer decision head.
//! It outputs raw logits; pairing it with a loss function, an optimizer, or
//! a data pipeline is left to the caller.

pub mod error;
pub mod model;
pub mod stage;

pub use error::ClassifierError;
pub use model::{Classifier, ClassifierConfig};
