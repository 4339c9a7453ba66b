pub mod order;
pub mod runner;
pub mod store;

pub use order::*;
pub use runner::*;
pub use store::*;
