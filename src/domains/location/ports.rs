use super::table::{Coordinate, LocationTable};

/// Port the delivery domain depends on for turning location names into grid
/// coordinates. The built-in campus table and file-backed sources implement it.
pub trait LocationLookup: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Coordinate>;
    /// Full table, for observers.
    fn table(&self) -> LocationTable;
}
