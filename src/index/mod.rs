mod accumulate;
mod compact;
mod error;

use std::collections::HashMap;

use serde::Serialize;

pub use accumulate::{Accumulator, AccumulatorRecord, accumulate};
pub use compact::compact;
pub use error::{IngestError, LookupError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Junction reference to the coordinates of every node carrying it.
pub type JunctionMap = HashMap<String, Vec<Coordinate>>;

/// Road reference to its junctions.
///
/// Coordinate order within a junction follows accumulator iteration order,
/// which is not stable between runs.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Index {
    pub(crate) roads: HashMap<String, JunctionMap>,
}

impl Index {
    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    pub fn junction_count(&self) -> usize {
        self.roads.values().map(HashMap::len).sum()
    }

    pub fn coordinate_count(&self) -> usize {
        self.roads
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn lookup(&self, road: &str, junction: &str) -> Result<&[Coordinate], LookupError> {
        let junctions = self.roads.get(road).ok_or(LookupError::RoadNotFound)?;
        junctions
            .get(junction)
            .map(Vec::as_slice)
            .ok_or(LookupError::JunctionNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_index() -> Index {
        let mut junctions = JunctionMap::new();
        junctions.insert("1".to_string(), vec![Coordinate { lat: 52.4, lon: -1.2 }]);
        junctions.insert(
            "2".to_string(),
            vec![
                Coordinate { lat: 52.3, lon: -1.1 },
                Coordinate { lat: 52.31, lon: -1.12 },
            ],
        );

        let mut roads = HashMap::new();
        roads.insert("M1".to_string(), junctions);
        Index { roads }
    }

    #[test]
    fn lookup_distinguishes_missing_road_from_missing_junction() {
        let index = test_index();

        assert_eq!(index.lookup("M6", "1"), Err(LookupError::RoadNotFound));
        assert_eq!(index.lookup("M1", "99"), Err(LookupError::JunctionNotFound));
        assert_ne!(
            LookupError::RoadNotFound.to_string(),
            LookupError::JunctionNotFound.to_string()
        );
    }

    #[test]
    fn lookup_returns_stored_coordinates() {
        let index = test_index();

        assert_eq!(
            index.lookup("M1", "1").unwrap(),
            &[Coordinate { lat: 52.4, lon: -1.2 }]
        );
        assert_eq!(index.lookup("M1", "2").unwrap().len(), 2);
    }

    #[test]
    fn counts_roads_junctions_and_coordinates() {
        let index = test_index();

        assert_eq!(index.road_count(), 1);
        assert_eq!(index.junction_count(), 2);
        assert_eq!(index.coordinate_count(), 3);
        assert!(!index.is_empty());
        assert!(Index::default().is_empty());
    }

    #[test]
    fn coordinate_serializes_with_capitalized_fields() {
        let json = serde_json::to_string(&Coordinate { lat: 1.5, lon: 2.0 }).unwrap();

        assert_eq!(json, r#"{"Lat":1.5,"Lon":2.0}"#);
    }
}
