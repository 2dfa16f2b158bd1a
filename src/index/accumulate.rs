use std::collections::HashMap;

use crate::{
    classify::{is_junction_point, is_relevant_way, reference},
    source::Primitive,
};

use super::{Coordinate, IngestError};

/// What is known about one node id so far.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AccumulatorRecord {
    pub coordinate: Option<Coordinate>,
    pub junction: Option<String>,
    pub road: Option<String>,
}

static EMPTY_RECORD: AccumulatorRecord = AccumulatorRecord {
    coordinate: None,
    junction: None,
    road: None,
};

impl AccumulatorRecord {
    pub fn is_complete(&self) -> bool {
        self.coordinate.is_some()
            && self.junction.as_deref().is_some_and(|junction| !junction.is_empty())
            && self.road.as_deref().is_some_and(|road| !road.is_empty())
    }
}

/// Per node id accumulators produced by a single pass over a primitive stream.
#[derive(Debug, Default)]
pub struct Accumulator {
    pub(super) records: HashMap<i64, AccumulatorRecord>,
}

impl Accumulator {
    /// The record for `id`; unknown ids read as the empty record.
    pub fn record(&self, id: i64) -> &AccumulatorRecord {
        self.records.get(&id).unwrap_or(&EMPTY_RECORD)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = (i64, &AccumulatorRecord)> {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    fn record_junction(&mut self, id: i64, coordinate: Coordinate, junction: &str) {
        let record = self.records.entry(id).or_default();
        record.coordinate = Some(coordinate);
        record.junction = Some(junction.to_string());
    }

    fn record_road(&mut self, id: i64, road: &str) {
        self.records.entry(id).or_default().road = Some(road.to_string());
    }

    fn apply(&mut self, primitive: Primitive) {
        match primitive {
            Primitive::Point {
                id,
                coordinate,
                tags,
            } => {
                if !is_junction_point(&tags) {
                    return;
                }
                if let Some(junction) = reference(&tags) {
                    self.record_junction(id, coordinate, junction);
                }
            }
            Primitive::Way { tags, node_ids } => {
                if !is_relevant_way(&tags) {
                    return;
                }
                if let Some(road) = reference(&tags) {
                    for id in node_ids {
                        self.record_road(id, road);
                    }
                }
            }
            Primitive::Relation => {}
        }
    }
}

/// Consume a primitive stream, recording junction points and relevant road
/// memberships per node id in whatever order they arrive.
///
/// The first decode error aborts the pass and the partial accumulator is
/// dropped.
pub fn accumulate<I>(primitives: I) -> Result<Accumulator, IngestError>
where
    I: IntoIterator<Item = Result<Primitive, IngestError>>,
{
    let mut accumulator = Accumulator::default();

    for primitive in primitives {
        accumulator.apply(primitive?);
    }

    Ok(accumulator)
}

#[cfg(test)]
pub(crate) mod test_utils {
    use crate::{
        Coordinate, IngestError,
        source::{Primitive, Tags},
    };

    pub(crate) fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    pub(crate) fn junction(id: i64, lat: f64, lon: f64, reference: &str) -> Primitive {
        Primitive::Point {
            id,
            coordinate: Coordinate { lat, lon },
            tags: tags(&[("ref", reference), ("highway", "motorway_junction")]),
        }
    }

    pub(crate) fn road(reference: &str, highway: &str, node_ids: &[i64]) -> Primitive {
        Primitive::Way {
            tags: tags(&[("ref", reference), ("highway", highway)]),
            node_ids: node_ids.to_vec(),
        }
    }

    /// The stream from the motorway fixture: one road, two junctions, one
    /// untagged node and one tertiary way.
    pub(crate) fn motorway_stream() -> Vec<Result<Primitive, IngestError>> {
        vec![
            Ok(road("M100", "motorway", &[100, 200, 300])),
            Ok(junction(100, 1.0, 2.0, "10")),
            Ok(junction(200, 3.0, 4.0, "20")),
            Ok(Primitive::Point {
                id: 400,
                coordinate: Coordinate { lat: 5.0, lon: 6.0 },
                tags: Tags::new(),
            }),
            Ok(road("M200", "tertiary", &[500])),
            Ok(Primitive::Relation),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{
        test_utils::{junction, motorway_stream, road, tags},
        *,
    };

    struct Expected {
        name: &'static str,
        id: i64,
        coordinate: Option<Coordinate>,
        junction: Option<&'static str>,
        road: Option<&'static str>,
        present: bool,
    }

    #[test]
    fn records_partial_knowledge_per_node() {
        let accumulator = accumulate(motorway_stream()).unwrap();

        let cases = [
            Expected {
                name: "junction 100 on M100",
                id: 100,
                coordinate: Some(Coordinate { lat: 1.0, lon: 2.0 }),
                junction: Some("10"),
                road: Some("M100"),
                present: true,
            },
            Expected {
                name: "junction 200 on M100",
                id: 200,
                coordinate: Some(Coordinate { lat: 3.0, lon: 4.0 }),
                junction: Some("20"),
                road: Some("M100"),
                present: true,
            },
            Expected {
                name: "way-only node 300",
                id: 300,
                coordinate: None,
                junction: None,
                road: Some("M100"),
                present: true,
            },
            Expected {
                name: "untagged node 400",
                id: 400,
                coordinate: None,
                junction: None,
                road: None,
                present: false,
            },
            Expected {
                name: "tertiary way node 500",
                id: 500,
                coordinate: None,
                junction: None,
                road: None,
                present: false,
            },
        ];

        for case in cases {
            let record = accumulator.record(case.id);
            assert_eq!(record.coordinate, case.coordinate, "{}", case.name);
            assert_eq!(record.junction.as_deref(), case.junction, "{}", case.name);
            assert_eq!(record.road.as_deref(), case.road, "{}", case.name);
            assert_eq!(accumulator.contains(case.id), case.present, "{}", case.name);
        }

        assert_eq!(accumulator.len(), 3);
    }

    #[test]
    fn unknown_ids_read_as_empty_records() {
        let accumulator = accumulate(Vec::<Result<Primitive, IngestError>>::new()).unwrap();

        assert!(accumulator.is_empty());
        assert_eq!(accumulator.record(42), &AccumulatorRecord::default());
        assert!(!accumulator.record(42).is_complete());
    }

    #[test]
    fn non_junction_points_are_not_recorded() {
        let stream = vec![
            Ok(Primitive::Point {
                id: 1,
                coordinate: Coordinate { lat: 1.0, lon: 1.0 },
                tags: tags(&[("highway", "traffic_signals"), ("ref", "1")]),
            }),
            Ok(Primitive::Point {
                id: 2,
                coordinate: Coordinate { lat: 1.0, lon: 1.0 },
                tags: tags(&[("highway", "motorway_junction")]),
            }),
        ];

        let accumulator = accumulate(stream).unwrap();

        assert!(accumulator.is_empty());
    }

    #[test]
    fn last_relevant_way_wins_the_road_field() {
        let stream = vec![
            Ok(junction(1, 1.0, 1.0, "5")),
            Ok(road("A1", "trunk", &[1, 2])),
            Ok(road("A1(M)", "motorway", &[1])),
        ];

        let accumulator = accumulate(stream).unwrap();

        assert_eq!(accumulator.record(1).road.as_deref(), Some("A1(M)"));
        assert_eq!(accumulator.record(2).road.as_deref(), Some("A1"));
    }

    #[test]
    fn point_and_way_writes_touch_disjoint_fields() {
        let stream = vec![
            Ok(road("M1", "motorway", &[7])),
            Ok(junction(7, 52.0, -1.0, "15")),
            Ok(road("M1", "motorway_link", &[7])),
        ];

        let accumulator = accumulate(stream).unwrap();
        let record = accumulator.record(7);

        assert_eq!(record.coordinate, Some(Coordinate { lat: 52.0, lon: -1.0 }));
        assert_eq!(record.junction.as_deref(), Some("15"));
        assert_eq!(record.road.as_deref(), Some("M1"));
        assert!(record.is_complete());
    }

    #[test]
    fn decode_error_aborts_the_pass() {
        let stream = vec![
            Ok(junction(1, 1.0, 1.0, "5")),
            Err(IngestError::Decode("truncated blob".to_string())),
            Ok(road("M1", "motorway", &[1])),
        ];

        let result = accumulate(stream);

        assert!(matches!(
            result,
            Err(IngestError::Decode(message)) if message == "truncated blob"
        ));
    }
}
