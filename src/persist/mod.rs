pub mod codec;
pub mod scale;

pub use codec::{load, read, save, write, Encoding};
pub use scale::ScaleTable;
