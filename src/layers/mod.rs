pub mod dense;
pub mod input;

pub use dense::{Layer, Neuron};
pub use input::{Feature, InputLayer};
