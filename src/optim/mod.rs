pub mod adam;
pub mod adamw;
pub mod bank;
pub mod optimizer;
pub mod sgd;

pub use adam::Adam;
pub use adamw::AdamW;
pub use bank::OptimizerBank;
pub use optimizer::Optimizer;
pub use sgd::Sgd;
