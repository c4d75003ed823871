//! Neural network engine.
//!
//! Implements the single feedforward topology the agents use:
//! - dense layers with a trailing bias column
//! - batched gradient backpropagation
//! - weight mutation and single-cut crossover for the evolutionary path
//! - text persistence lives in `crate::checkpoint`

mod crossover;
mod mutation;
mod network;

pub mod activation;

pub use activation::Activation;
pub use network::{Network, WEIGHT_MAX, WEIGHT_MIN};
