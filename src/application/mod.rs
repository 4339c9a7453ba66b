pub mod broadcaster;
pub mod delivery_service;

pub use broadcaster::*;
pub use delivery_service::*;
