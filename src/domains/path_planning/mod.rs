pub mod planner;
pub mod types;

pub use planner::*;
pub use types::*;
