use once_cell::sync::Lazy;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::ports::LocationLookup;

/// Grid coordinate of a named campus location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

static CAMPUS: Lazy<LocationTable> = Lazy::new(|| {
    LocationTable::from_entries([
        ("Library", Coordinate::new(10, 15)),
        ("Student Center", Coordinate::new(-5, 20)),
        ("Engineering Building", Coordinate::new(20, 10)),
        ("Dining Hall", Coordinate::new(-10, 5)),
        ("Dormitory A", Coordinate::new(15, -10)),
        ("Dormitory B", Coordinate::new(-15, -5)),
        ("Sports Complex", Coordinate::new(25, -15)),
        ("Admin Building", Coordinate::new(0, 30)),
        ("Lab Building", Coordinate::new(-20, 15)),
        ("Parking Lot", Coordinate::new(30, 0)),
        ("CSVTU UTD 1 Building", Coordinate::new(35, 20)),
    ])
});

/// Static name -> coordinate table. Keeps insertion order so `GET /locations`
/// lists places the way they were declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationTable {
    entries: Vec<(String, Coordinate)>,
}

impl LocationTable {
    pub fn campus_default() -> Self {
        CAMPUS.clone()
    }

    /// Later duplicates replace the coordinate of the earlier entry in place.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Coordinate)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (name, coordinate) in entries {
            table.insert(name.into(), coordinate);
        }
        table
    }

    fn insert(&mut self, name: String, coordinate: Coordinate) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = coordinate,
            None => self.entries.push((name, coordinate)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Coordinate)> {
        self.entries.iter().map(|(name, c)| (name.as_str(), *c))
    }
}

impl LocationLookup for LocationTable {
    fn resolve(&self, name: &str) -> Option<Coordinate> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, c)| *c)
    }

    fn table(&self) -> LocationTable {
        self.clone()
    }
}

impl Serialize for LocationTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, coordinate) in &self.entries {
            map.serialize_entry(name, coordinate)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LocationTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = LocationTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of location name to {x, y}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = LocationTable::default();
                while let Some((name, coordinate)) = access.next_entry::<String, Coordinate>()? {
                    table.insert(name, coordinate);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campus_table_resolves_known_names() {
        let table = LocationTable::campus_default();
        assert_eq!(table.len(), 11);
        assert_eq!(table.resolve("Library"), Some(Coordinate::new(10, 15)));
        assert_eq!(table.resolve("Student Center"), Some(Coordinate::new(-5, 20)));
        assert_eq!(table.resolve("library"), None);
    }

    #[test]
    fn serializes_in_declaration_order() {
        let table = LocationTable::from_entries([
            ("Zeta", Coordinate::new(1, 1)),
            ("Alpha", Coordinate::new(2, 2)),
        ]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"Zeta":{"x":1,"y":1},"Alpha":{"x":2,"y":2}}"#);

        let back: LocationTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
