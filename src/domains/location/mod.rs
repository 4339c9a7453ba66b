pub mod ports;
pub mod table;

pub use ports::*;
pub use table::*;
