pub mod network;
pub mod spec;

pub use network::{Network, NetworkBuilder};
pub use spec::{LayerSpec, NetworkSpec};
