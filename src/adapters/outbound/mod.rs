pub mod domain_loggers;
pub mod location_data;

pub use domain_loggers::*;
pub use location_data::*;
