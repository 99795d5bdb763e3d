//! Basic value types shared by the models and the engine.

pub mod probability;
pub mod streams;

pub use probability::Probability;
pub use streams::{RngStreams, Stage};
