use super::{Accumulator, AccumulatorRecord, Index};

/// Fold every complete accumulator record into the road → junction index.
///
/// Incomplete records (a junction never referenced by a relevant way, or a
/// way node that is not a junction) are dropped.
pub fn compact(accumulator: Accumulator) -> Index {
    let mut index = Index::default();

    for record in accumulator.records.into_values() {
        let AccumulatorRecord {
            coordinate: Some(coordinate),
            junction: Some(junction),
            road: Some(road),
        } = record
        else {
            continue;
        };
        if junction.is_empty() || road.is_empty() {
            continue;
        }

        index
            .roads
            .entry(road)
            .or_default()
            .entry(junction)
            .or_default()
            .push(coordinate);
    }

    index
}
