pub mod command;
pub mod executor;
pub mod state;

pub use command::*;
pub use executor::*;
pub use state::*;
