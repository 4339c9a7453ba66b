pub mod delivery;
pub mod location;
pub mod logger;
pub mod path_planning;
pub mod robot;

pub use delivery::*;
pub use location::*;
pub use logger::*;
pub use path_planning::*;
pub use robot::*;
